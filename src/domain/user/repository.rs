//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId, UserPatch};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations enforce email uniqueness themselves and report a clash as
/// a validation error on the `email` field.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Store a new user under a freshly assigned ID
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Store the root administrator under [`UserId::ROOT`]
    async fn create_root(&self, user: NewUser) -> Result<User, DomainError>;

    /// Atomically apply a patch, returning `None` if the user does not exist
    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List all users in creation order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
