//! The authenticated caller of an account operation

use super::entity::{User, UserId, UserRole};
use crate::domain::DomainError;

pub const UNAUTHORIZED_ACTION_MESSAGE: &str = "This action is unauthorized.";
pub const DELETE_SELF_MESSAGE: &str = "You cannot delete your own user";
pub const DELETE_ROOT_MESSAGE: &str = "You cannot delete the admin root user";

/// Identity and role of whoever is performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    role: UserRole,
}

impl Actor {
    pub fn new(id: UserId, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_self(&self, id: UserId) -> bool {
        self.id == id
    }

    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::forbidden(UNAUTHORIZED_ACTION_MESSAGE))
        }
    }

    /// Self-deletion is checked before the root guard
    pub fn ensure_can_delete(&self, target: UserId) -> Result<(), DomainError> {
        if self.is_self(target) {
            return Err(DomainError::forbidden(DELETE_SELF_MESSAGE));
        }

        if target.is_root() {
            return Err(DomainError::forbidden(DELETE_ROOT_MESSAGE));
        }

        Ok(())
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forbidden_message(result: Result<(), DomainError>) -> String {
        match result {
            Err(DomainError::Forbidden { message }) => message,
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(Actor::new(UserId::new(5), UserRole::Admin).require_admin().is_ok());

        let normal = Actor::new(UserId::new(5), UserRole::Normal);
        assert_eq!(
            forbidden_message(normal.require_admin()),
            UNAUTHORIZED_ACTION_MESSAGE
        );
    }

    #[test]
    fn test_cannot_delete_self() {
        let actor = Actor::new(UserId::new(7), UserRole::Admin);
        assert_eq!(
            forbidden_message(actor.ensure_can_delete(UserId::new(7))),
            DELETE_SELF_MESSAGE
        );
    }

    #[test]
    fn test_root_deleting_itself_reports_self() {
        let root = Actor::new(UserId::ROOT, UserRole::Admin);
        assert_eq!(
            forbidden_message(root.ensure_can_delete(UserId::ROOT)),
            DELETE_SELF_MESSAGE
        );
    }

    #[test]
    fn test_cannot_delete_root() {
        let actor = Actor::new(UserId::new(2), UserRole::Admin);
        assert_eq!(
            forbidden_message(actor.ensure_can_delete(UserId::ROOT)),
            DELETE_ROOT_MESSAGE
        );
    }

    #[test]
    fn test_can_delete_other() {
        let actor = Actor::new(UserId::new(2), UserRole::Admin);
        assert!(actor.ensure_can_delete(UserId::new(3)).is_ok());
    }
}
