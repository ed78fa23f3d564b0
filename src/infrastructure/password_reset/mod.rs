//! Password reset infrastructure
//!
//! Token generation, storage backends, link delivery and the reset flow.

mod notifier;
mod postgres_repository;
mod repository;
mod service;
mod token;

pub use notifier::{LogResetNotifier, ResetNotifier};
pub use postgres_repository::PostgresPasswordResetRepository;
pub use repository::InMemoryPasswordResetRepository;
pub use service::{
    ForgotPasswordRequest, PasswordResetService, PasswordResetSettings, ResetPasswordRequest,
    INVALID_EMAIL_MESSAGE, INVALID_TOKEN_MESSAGE,
};
pub use token::{hash_token, verify_token, GeneratedResetToken, ResetTokenGenerator};

#[cfg(test)]
pub use notifier::mock::RecordingNotifier;
