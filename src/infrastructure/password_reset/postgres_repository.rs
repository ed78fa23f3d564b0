//! PostgreSQL password reset repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::password_reset::{PasswordReset, PasswordResetRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of PasswordResetRepository
#[derive(Debug, Clone)]
pub struct PostgresPasswordResetRepository {
    pool: PgPool,
}

impl PostgresPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for PostgresPasswordResetRepository {
    async fn save(&self, reset: PasswordReset) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO password_resets (email, token_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email)
            DO UPDATE SET token_hash = EXCLUDED.token_hash, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(reset.email())
        .bind(reset.token_hash())
        .bind(reset.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save password reset: {}", e)))?;

        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<PasswordReset>, DomainError> {
        let row = sqlx::query(
            "SELECT email, token_hash, created_at FROM password_resets WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get password reset: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let column_error =
            |e: sqlx::Error| DomainError::storage(format!("Invalid password reset row: {}", e));

        Ok(Some(PasswordReset::restore(
            row.try_get("email").map_err(column_error)?,
            row.try_get("token_hash").map_err(column_error)?,
            row.try_get("created_at").map_err(column_error)?,
        )))
    }

    async fn delete(&self, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM password_resets WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete password reset: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
