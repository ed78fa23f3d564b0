//! User infrastructure module
//!
//! Password hashing with Argon2, the in-memory and PostgreSQL repositories,
//! and the service holding the account rules.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    AccessToken, CreateUserRequest, LoginRequest, RegisterUserRequest, RootAdmin,
    UpdatePasswordRequest, UpdateProfileRequest, UpdateUserRequest, UserService,
    BAD_CREDENTIALS_MESSAGE, USER_NOT_FOUND_MESSAGE,
};
