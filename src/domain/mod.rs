//! Domain layer - Core business rules and entities

pub mod error;
pub mod password_reset;
pub mod user;
pub mod validation;

pub use error::DomainError;
pub use validation::{FieldInput, ValidationErrors};
