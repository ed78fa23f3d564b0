//! Application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig,
    PasswordResetConfig, ServerConfig, StorageBackend, StorageConfig, MAX_TTL_MINUTES,
};
