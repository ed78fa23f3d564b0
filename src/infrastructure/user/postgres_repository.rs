//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::user::validation::EMAIL_TAKEN_MESSAGE;
use crate::domain::user::{NewUser, User, UserId, UserPatch, UserRepository, UserRole};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, email, password_hash, name, last_name, role, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, last_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create", e))?;

        row_to_user(&row)
    }

    async fn create_root(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(UserId::ROOT.value())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error("create root", e))?;

        // Explicit IDs bypass the sequence, so move it past the root
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('users', 'id'), GREATEST((SELECT MAX(id) FROM users), 1))",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to advance user sequence: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        row_to_user(&row)
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to lock user: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut user = row_to_user(&row)?;
        user.apply(patch);

        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, name = $4, last_name = $5,
                role = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.name())
        .bind(user.last_name())
        .bind(user.role().as_str())
        .bind(user.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("update", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(Some(user))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

/// Map write failures, turning the email unique constraint into a field error
fn write_error(action: &str, e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.constraint().is_some_and(|c| c.contains("email")) {
                DomainError::invalid_field("email", EMAIL_TAKEN_MESSAGE)
            } else {
                DomainError::storage(format!("Failed to {} user: {}", action, e))
            }
        }
        _ => DomainError::storage(format!("Failed to {} user: {}", action, e)),
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let column_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let role: String = row.try_get("role").map_err(column_error)?;
    let role: UserRole = role
        .parse()
        .map_err(|_| DomainError::storage(format!("Invalid user role '{}'", role)))?;

    Ok(User::restore(
        UserId::new(row.try_get("id").map_err(column_error)?),
        row.try_get("email").map_err(column_error)?,
        row.try_get("password_hash").map_err(column_error)?,
        row.try_get("name").map_err(column_error)?,
        row.try_get("last_name").map_err(column_error)?,
        role,
        row.try_get("created_at").map_err(column_error)?,
        row.try_get("updated_at").map_err(column_error)?,
    ))
}
