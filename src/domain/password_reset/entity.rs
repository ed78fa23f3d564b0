//! Pending password reset request

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A reset request waiting to be completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordReset {
    email: String,
    /// Digest of the token handed to the user
    #[serde(skip_serializing)]
    token_hash: String,
    created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn new(email: impl Into<String>, token_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token_hash: token_hash.into(),
            created_at: Utc::now(),
        }
    }

    pub fn restore(email: String, token_hash: String, created_at: DateTime<Utc>) -> Self {
        Self {
            email,
            token_hash,
            created_at,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token_hash(&self) -> &str {
        &self.token_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() >= self.created_at + ttl
    }
}
