//! User Admin API
//!
//! Account administration over HTTP:
//! - Login with JWT access tokens
//! - Self-service registration and profile management
//! - Administrator account management with a protected root account
//! - Password recovery through emailed reset links

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use rand::Rng;
use sqlx::PgPool;
use tracing::{info, warn};

use api::state::AppState;
use config::{AdminConfig, StorageBackend};
use domain::password_reset::PasswordResetRepository;
use domain::DomainError;
use domain::user::UserRepository;
use infrastructure::{
    auth::{JwtConfig, JwtGenerator, JwtService},
    password_reset::{
        InMemoryPasswordResetRepository, LogResetNotifier, PasswordResetService,
        PasswordResetSettings, PostgresPasswordResetRepository, ResetNotifier,
    },
    storage::{self, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, RootAdmin, UserService},
};

/// Create the application state for the configured storage backend
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let notifier: Arc<dyn ResetNotifier> = Arc::new(LogResetNotifier::new());

    info!("Storage backend: {:?}", config.storage.backend);

    match config.storage.backend {
        StorageBackend::Memory => {
            build_app_state(
                config,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPasswordResetRepository::new()),
                notifier,
            )
            .await
        }
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;

            let applied = storage::run_storage_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!(applied, "Database schema is up to date");

            build_app_state(
                config,
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresPasswordResetRepository::new(pool)),
                notifier,
            )
            .await
        }
    }
}

/// Wire services over the given repositories and seed the root admin
pub async fn build_app_state<U, R>(
    config: &AppConfig,
    users: Arc<U>,
    resets: Arc<R>,
    notifier: Arc<dyn ResetNotifier>,
) -> anyhow::Result<AppState>
where
    U: UserRepository + 'static,
    R: PasswordResetRepository + 'static,
{
    config.validate()?;

    let hasher = Arc::new(Argon2Hasher::new());

    let user_service = Arc::new(
        UserService::new(users.clone(), hasher.clone()).with_password_resets(resets.clone()),
    );
    seed_root_admin(&user_service, &config.admin).await?;

    let password_reset_service = Arc::new(PasswordResetService::new(
        users,
        resets,
        hasher,
        notifier,
        PasswordResetSettings {
            frontend_url: config.password_reset.frontend_url.clone(),
            token_ttl: config.password_reset.token_ttl()?,
        },
    ));

    let jwt_service = create_jwt_service_from_secret(config)?;

    Ok(AppState::new(user_service, password_reset_service, jwt_service))
}

/// Open the PostgreSQL pool described by the configuration
pub async fn connect_database(config: &AppConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database_url()
        .context("database.url or DATABASE_URL is required for the postgres backend")?;

    info!("Connecting to PostgreSQL...");
    let pool = storage::connect(
        &PostgresConfig::new(url).with_max_connections(config.database.max_connections),
    )
    .await?;

    Ok(pool)
}

fn create_jwt_service_from_secret(
    config: &AppConfig,
) -> Result<Arc<dyn JwtGenerator>, DomainError> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .filter(|secret| !secret.is_empty())
        .or_else(|| std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| {
            warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Tokens will NOT remain valid across restarts."
            );
            generate_random_string(64)
        });

    Ok(Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        config.auth.jwt_ttl()?,
    ))))
}

fn generate_random_string(length: usize) -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Create the root admin (id 1) if no users exist
async fn seed_root_admin<U>(
    user_service: &UserService<U, Argon2Hasher>,
    admin: &AdminConfig,
) -> anyhow::Result<()>
where
    U: UserRepository,
{
    // Config first, then ADMIN_DEFAULT_PASSWORD, otherwise a random password
    let configured = admin
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| std::env::var("ADMIN_DEFAULT_PASSWORD").ok().filter(|p| !p.is_empty()));

    let (password, is_default) = match configured {
        Some(p) => (p, true),
        None => (generate_random_string(16), false),
    };

    let created = user_service
        .ensure_root_admin(RootAdmin {
            email: admin.email.clone(),
            password: password.clone(),
            name: admin.name.clone(),
            last_name: admin.last_name.clone(),
        })
        .await
        .context("Failed to create the root admin")?;

    if created.is_none() {
        return Ok(());
    }

    info!("===========================================");
    info!("Root admin user created!");
    info!("Email: {}", admin.email);

    if is_default {
        info!("Password: (set via configuration)");
    } else {
        info!("Password: {}", password);
    }

    info!("Please change this password after first login.");
    info!("===========================================");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use crate::infrastructure::user::PasswordHasher;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("test-secret".to_string());
        config.admin.password = Some("rootpassword".to_string());
        config
    }

    #[tokio::test]
    async fn test_memory_state_seeds_root_admin() {
        let state = create_app_state(&test_config()).await.unwrap();

        assert_eq!(state.user_service.count().await.unwrap(), 1);

        let root = state.user_service.find(UserId::ROOT).await.unwrap().unwrap();
        assert_eq!(root.email(), "admin@example.com");
        assert!(root.is_admin());
        assert!(Argon2Hasher::new().verify("rootpassword", root.password_hash()));
    }

    #[test]
    fn test_configured_jwt_secret_is_used() {
        let config = test_config();
        let service = create_jwt_service_from_secret(&config).unwrap();
        assert_eq!(service.expires_in(), 3600);
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_fails_startup() {
        let mut config = test_config();
        config.password_reset.token_ttl_minutes = u64::MAX;

        assert!(create_app_state(&config).await.is_err());
    }

    #[test]
    fn test_random_string() {
        let value = generate_random_string(16);
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
