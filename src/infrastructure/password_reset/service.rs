//! Password reset flow
//!
//! A reset starts with a request for an email, which stores a token digest and
//! sends a link. It completes when the token from that link is presented with
//! a new password.

use std::sync::Arc;

use chrono::Duration;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::password_reset::{PasswordReset, PasswordResetRepository};
use crate::domain::user::validation::{check_email, MIN_PASSWORD_LENGTH, UNKNOWN_EMAIL_MESSAGE};
use crate::domain::user::{User, UserPatch, UserRepository};
use crate::domain::{DomainError, FieldInput, ValidationErrors};
use crate::infrastructure::user::{PasswordHasher, USER_NOT_FOUND_MESSAGE};

use super::notifier::ResetNotifier;
use super::token::{verify_token, ResetTokenGenerator};

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Request for a reset link
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: FieldInput,
}

/// New password submitted with a reset token
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub email: FieldInput,
    pub password: FieldInput,
    pub password_confirmation: FieldInput,
}

/// Settings for reset links
#[derive(Debug, Clone)]
pub struct PasswordResetSettings {
    /// Base URL of the frontend that hosts the reset form
    pub frontend_url: String,
    /// How long a reset link stays usable
    pub token_ttl: Duration,
}

/// Service driving the reset flow
#[derive(Debug)]
pub struct PasswordResetService<U, R, H>
where
    U: UserRepository,
    R: PasswordResetRepository,
    H: PasswordHasher,
{
    users: Arc<U>,
    resets: Arc<R>,
    hasher: Arc<H>,
    notifier: Arc<dyn ResetNotifier>,
    tokens: ResetTokenGenerator,
    settings: PasswordResetSettings,
}

impl<U, R, H> PasswordResetService<U, R, H>
where
    U: UserRepository,
    R: PasswordResetRepository,
    H: PasswordHasher,
{
    pub fn new(
        users: Arc<U>,
        resets: Arc<R>,
        hasher: Arc<H>,
        notifier: Arc<dyn ResetNotifier>,
        settings: PasswordResetSettings,
    ) -> Self {
        Self {
            users,
            resets,
            hasher,
            notifier,
            tokens: ResetTokenGenerator::new(),
            settings,
        }
    }

    /// Issue a reset token for an existing account and send the link
    pub async fn request_reset(&self, request: ForgotPasswordRequest) -> Result<(), DomainError> {
        let mut errors = ValidationErrors::new();
        let email = check_email(&mut errors, &request.email, true);

        let mut user = None;
        if let Some(email) = &email {
            user = self.users.get_by_email(email).await?;
            if user.is_none() {
                errors.add("email", UNKNOWN_EMAIL_MESSAGE);
            }
        }
        errors.into_result()?;

        let user = user.ok_or_else(|| DomainError::not_found(USER_NOT_FOUND_MESSAGE))?;

        let generated = self.tokens.generate();
        self.resets
            .save(PasswordReset::new(user.email(), generated.hash))
            .await?;

        let link = self.reset_link(&generated.token, user.email());
        self.notifier.send_reset_link(&user, &link).await?;

        info!(user_id = %user.id(), "Password reset requested");
        Ok(())
    }

    /// Replace the password of the account the token was issued for
    pub async fn reset(&self, token: &str, request: ResetPasswordRequest) -> Result<User, DomainError> {
        let mut errors = ValidationErrors::new();
        let email = check_email(&mut errors, &request.email, true);
        let password = errors
            .check("password", &request.password)
            .required()
            .string()
            .min(MIN_PASSWORD_LENGTH)
            .confirmed(&request.password_confirmation)
            .value();
        errors.into_result()?;

        let email = email.unwrap_or_default();

        let user = self.users.get_by_email(&email).await?;
        let pending = self.resets.get(&email).await?;
        let (Some(user), Some(pending)) = (user, pending) else {
            warn!(email = %email, "Password reset for unknown email");
            return Err(DomainError::internal(INVALID_EMAIL_MESSAGE));
        };

        if !verify_token(token, pending.token_hash()) || pending.is_expired(self.settings.token_ttl) {
            warn!(user_id = %user.id(), "Password reset with invalid token");
            return Err(DomainError::internal(INVALID_TOKEN_MESSAGE));
        }

        let patch = UserPatch {
            password_hash: Some(self.hasher.hash(&password.unwrap_or_default())?),
            ..Default::default()
        };

        let user = self
            .users
            .update(&user.id(), patch)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND_MESSAGE))?;
        self.resets.delete(&email).await?;

        info!(user_id = %user.id(), "Password reset completed");
        Ok(user)
    }

    fn reset_link(&self, token: &str, email: &str) -> String {
        format!(
            "{}/reset-password?token={}&email={}",
            self.settings.frontend_url.trim_end_matches('/'),
            urlencoding::encode(token),
            urlencoding::encode(email)
        )
    }
}
