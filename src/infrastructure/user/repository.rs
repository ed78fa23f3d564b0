//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::validation::EMAIL_TAKEN_MESSAGE;
use crate::domain::user::{NewUser, User, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct Inner {
    users: BTreeMap<UserId, User>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, UserId>,
    /// Next ID to hand out; IDs are never reused
    next_id: i64,
}

impl Inner {
    fn insert(&mut self, id: UserId, user: NewUser) -> Result<User, DomainError> {
        if self.users.contains_key(&id) {
            return Err(DomainError::storage(format!("User with ID '{}' already exists", id)));
        }

        if self.email_index.contains_key(&user.email) {
            return Err(DomainError::invalid_field("email", EMAIL_TAKEN_MESSAGE));
        }

        let user = User::new(id, user);
        self.email_index.insert(user.email().to_string(), id);
        self.users.insert(id, user.clone());
        self.next_id = self.next_id.max(id.value() + 1);

        Ok(user)
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                users: BTreeMap::new(),
                email_index: HashMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .email_index
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;
        let id = UserId::new(inner.next_id);
        inner.insert(id, user)
    }

    async fn create_root(&self, user: NewUser) -> Result<User, DomainError> {
        self.inner.write().await.insert(UserId::ROOT, user)
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut inner = self.inner.write().await;
        let Inner {
            users, email_index, ..
        } = &mut *inner;

        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };

        // If the email changes, check uniqueness and move the index entry
        if let Some(new_email) = patch.email.as_deref() {
            if new_email != user.email() {
                if email_index.contains_key(new_email) {
                    return Err(DomainError::invalid_field("email", EMAIL_TAKEN_MESSAGE));
                }

                email_index.remove(user.email());
                email_index.insert(new_email.to_string(), *id);
            }
        }

        user.apply(patch);
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.users.remove(id) {
            Some(user) => {
                inner.email_index.remove(user.email());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.inner.read().await.users.len())
    }
}
