//! Password reset repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::PasswordReset;
use crate::domain::DomainError;

/// Storage for pending reset requests, one per email
#[async_trait]
pub trait PasswordResetRepository: Send + Sync + Debug {
    /// Store a request, replacing any earlier one for the same email
    async fn save(&self, reset: PasswordReset) -> Result<(), DomainError>;

    /// Get the pending request for an email
    async fn get(&self, email: &str) -> Result<Option<PasswordReset>, DomainError>;

    /// Remove the pending request for an email
    async fn delete(&self, email: &str) -> Result<bool, DomainError>;
}
