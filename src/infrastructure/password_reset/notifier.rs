//! Delivery of reset links to account holders

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::domain::user::User;
use crate::domain::DomainError;

/// Sends a reset link to the owner of an account
#[async_trait]
pub trait ResetNotifier: Send + Sync + Debug {
    async fn send_reset_link(&self, user: &User, link: &str) -> Result<(), DomainError>;
}

/// Notifier that only writes the link to the log
///
/// Stands in for a mail transport. The link itself is logged at debug level
/// so it stays out of production logs.
#[derive(Debug, Clone, Default)]
pub struct LogResetNotifier;

impl LogResetNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send_reset_link(&self, user: &User, link: &str) -> Result<(), DomainError> {
        info!(user_id = %user.id(), email = %user.email(), "Password reset link issued");
        debug!(user_id = %user.id(), link = %link, "Password reset link");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, UserId, UserRole};

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        let user = User::new(
            UserId::new(3),
            NewUser {
                email: "jane@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                role: UserRole::Normal,
            },
        );

        let result = LogResetNotifier::new()
            .send_reset_link(&user, "http://front.app/reset-password?token=abc")
            .await;
        assert!(result.is_ok());
    }
}
