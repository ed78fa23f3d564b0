use chrono::Duration;
use serde::Deserialize;

use crate::domain::DomainError;

/// Upper bound for token and reset link lifetimes (one year)
pub const MAX_TTL_MINUTES: u64 = 60 * 24 * 365;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub password_reset: PasswordResetConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where accounts and reset requests are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Falls back to `JWT_SECRET`, then to a random secret
    pub jwt_secret: Option<String>,
    pub jwt_ttl_minutes: u64,
}

/// Root administrator seeded into an empty store
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub name: String,
    pub last_name: String,
    /// Falls back to `ADMIN_DEFAULT_PASSWORD`, then to a random password
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordResetConfig {
    /// Base URL of the frontend that renders the reset form
    pub frontend_url: String,
    pub token_ttl_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_ttl_minutes: 60,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            name: "Root".to_string(),
            last_name: "Admin".to_string(),
            password: None,
        }
    }
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            frontend_url: "http://front.app".to_string(),
            token_ttl_minutes: 60,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(config)
    }

    /// Reject settings that would only fail once requests arrive
    pub fn validate(&self) -> Result<(), DomainError> {
        self.auth.jwt_ttl()?;
        self.password_reset.token_ttl()?;
        Ok(())
    }

    /// Database URL from config, falling back to `DATABASE_URL`
    pub fn database_url(&self) -> Option<String> {
        self.database
            .url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }
}

impl AuthConfig {
    /// Access token lifetime
    pub fn jwt_ttl(&self) -> Result<Duration, DomainError> {
        ttl_from_minutes("auth.jwt_ttl_minutes", self.jwt_ttl_minutes)
    }
}

impl PasswordResetConfig {
    /// How long a reset link stays usable
    pub fn token_ttl(&self) -> Result<Duration, DomainError> {
        ttl_from_minutes("password_reset.token_ttl_minutes", self.token_ttl_minutes)
    }
}

fn ttl_from_minutes(key: &str, minutes: u64) -> Result<Duration, DomainError> {
    let out_of_range = || {
        DomainError::configuration(format!(
            "{} must be between 1 and {} minutes, got {}",
            key, MAX_TTL_MINUTES, minutes
        ))
    };

    let value = i64::try_from(minutes).map_err(|_| out_of_range())?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        return Err(out_of_range());
    }

    Duration::try_minutes(value).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.jwt_ttl_minutes, 60);
        assert_eq!(config.password_reset.token_ttl_minutes, 60);
        assert!(config.admin.password.is_none());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let source = config::Config::builder()
            .add_source(config::File::from_str(
                "[storage]\nbackend = \"postgres\"\n[auth]\njwt_ttl_minutes = 15\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = source.try_deserialize().unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.auth.jwt_ttl_minutes, 15);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.admin.email, "admin@example.com");
    }

    #[test]
    fn test_ttl_bounds() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.jwt_ttl().unwrap(), Duration::minutes(60));

        config.password_reset.token_ttl_minutes = MAX_TTL_MINUTES;
        assert!(config.validate().is_ok());

        for minutes in [0, MAX_TTL_MINUTES + 1, u64::MAX] {
            config.password_reset.token_ttl_minutes = minutes;
            assert!(matches!(
                config.validate(),
                Err(DomainError::Configuration { .. })
            ));
        }

        config.password_reset.token_ttl_minutes = 60;
        config.auth.jwt_ttl_minutes = i64::MAX as u64 + 1;
        let err = config.auth.jwt_ttl().unwrap_err();
        assert!(err.to_string().contains("auth.jwt_ttl_minutes"));
    }

    #[test]
    fn test_oversized_ttl_rejected_when_loaded() {
        let source = config::Config::builder()
            .add_source(config::File::from_str(
                "[password_reset]\ntoken_ttl_minutes = 9223372036854775807\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = source.try_deserialize().unwrap();
        assert!(config.validate().is_err());
    }
}
