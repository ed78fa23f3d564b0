//! Password reset domain
//!
//! A pending reset request is keyed by account email and stores only a
//! digest of the token that was sent out.

mod entity;
mod repository;

pub use entity::PasswordReset;
pub use repository::PasswordResetRepository;

#[cfg(test)]
pub use repository::mock::MockPasswordResetRepository;
