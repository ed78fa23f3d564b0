//! User domain
//!
//! Account entities, roles, the acting identity and the repository trait
//! backing the account rules.

mod actor;
mod entity;
mod repository;
pub mod validation;

pub use actor::{
    Actor, DELETE_ROOT_MESSAGE, DELETE_SELF_MESSAGE, UNAUTHORIZED_ACTION_MESSAGE,
};
pub use entity::{NewUser, User, UserId, UserPatch, UserRole};
pub use repository::UserRepository;

#[cfg(test)]
pub use repository::mock::MockUserRepository;
