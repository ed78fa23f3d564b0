//! Infrastructure layer - storage backends, crypto and service implementations

pub mod auth;
pub mod logging;
pub mod password_reset;
pub mod storage;
pub mod user;
