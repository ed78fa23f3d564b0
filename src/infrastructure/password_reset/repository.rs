//! In-memory password reset repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::password_reset::{PasswordReset, PasswordResetRepository};
use crate::domain::DomainError;

/// In-memory implementation of PasswordResetRepository
#[derive(Debug, Default)]
pub struct InMemoryPasswordResetRepository {
    resets: Arc<RwLock<HashMap<String, PasswordReset>>>,
}

impl InMemoryPasswordResetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn save(&self, reset: PasswordReset) -> Result<(), DomainError> {
        self.resets
            .write()
            .await
            .insert(reset.email().to_string(), reset);
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<PasswordReset>, DomainError> {
        Ok(self.resets.read().await.get(email).cloned())
    }

    async fn delete(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.resets.write().await.remove(email).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_replaces_previous_request() {
        let repo = InMemoryPasswordResetRepository::new();

        repo.save(PasswordReset::new("jane@example.com", "first")).await.unwrap();
        repo.save(PasswordReset::new("jane@example.com", "second")).await.unwrap();

        let reset = repo.get("jane@example.com").await.unwrap().unwrap();
        assert_eq!(reset.token_hash(), "second");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryPasswordResetRepository::new();
        repo.save(PasswordReset::new("jane@example.com", "digest")).await.unwrap();

        assert!(repo.delete("jane@example.com").await.unwrap());
        assert!(!repo.delete("jane@example.com").await.unwrap());
        assert!(repo.get("jane@example.com").await.unwrap().is_none());
    }
}
