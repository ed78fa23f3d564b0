//! Wire types shared by the HTTP handlers

pub mod envelope;
pub mod error;
pub mod json;
pub mod user;

pub use envelope::{ApiResponse, Envelope};
pub use error::ApiError;
pub use json::Json;
pub use user::{UserListData, UserData, UserResponse};
