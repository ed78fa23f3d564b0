//! Application state for shared services

use std::sync::Arc;

use crate::domain::password_reset::PasswordResetRepository;
use crate::domain::user::{Actor, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::password_reset::{
    ForgotPasswordRequest, PasswordResetService, ResetPasswordRequest,
};
use crate::infrastructure::user::{
    AccessToken, CreateUserRequest, LoginRequest, PasswordHasher, RegisterUserRequest,
    UpdatePasswordRequest, UpdateProfileRequest, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub password_reset_service: Arc<dyn PasswordResetServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        password_reset_service: Arc<dyn PasswordResetServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            password_reset_service,
            jwt_service,
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn login(
        &self,
        request: LoginRequest,
        tokens: &dyn JwtGenerator,
    ) -> Result<AccessToken, DomainError>;
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn create(&self, actor: &Actor, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn get(&self, actor: &Actor, id: &str) -> Result<User, DomainError>;
    async fn list(&self, actor: &Actor) -> Result<Vec<User>, DomainError>;
    async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError>;
    async fn delete(&self, actor: &Actor, id: &str) -> Result<(), DomainError>;
    async fn update_profile(
        &self,
        actor: &Actor,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError>;
    async fn update_password(
        &self,
        actor: &Actor,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError>;
    /// Resolve a token subject, without authorization
    async fn find(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for password reset operations
#[async_trait::async_trait]
pub trait PasswordResetServiceTrait: Send + Sync {
    async fn request_reset(&self, request: ForgotPasswordRequest) -> Result<(), DomainError>;
    async fn reset(&self, token: &str, request: ResetPasswordRequest) -> Result<User, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn login(
        &self,
        request: LoginRequest,
        tokens: &dyn JwtGenerator,
    ) -> Result<AccessToken, DomainError> {
        UserService::login(self, request, tokens).await
    }

    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn create(&self, actor: &Actor, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, actor, request).await
    }

    async fn get(&self, actor: &Actor, id: &str) -> Result<User, DomainError> {
        UserService::get(self, actor, id).await
    }

    async fn list(&self, actor: &Actor) -> Result<Vec<User>, DomainError> {
        UserService::list(self, actor).await
    }

    async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        UserService::update(self, actor, id, request).await
    }

    async fn delete(&self, actor: &Actor, id: &str) -> Result<(), DomainError> {
        UserService::delete(self, actor, id).await
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, actor, request).await
    }

    async fn update_password(
        &self,
        actor: &Actor,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError> {
        UserService::update_password(self, actor, request).await
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::find(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<U, R, H> PasswordResetServiceTrait for PasswordResetService<U, R, H>
where
    U: UserRepository + 'static,
    R: PasswordResetRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn request_reset(&self, request: ForgotPasswordRequest) -> Result<(), DomainError> {
        PasswordResetService::request_reset(self, request).await
    }

    async fn reset(&self, token: &str, request: ResetPasswordRequest) -> Result<User, DomainError> {
        PasswordResetService::reset(self, token, request).await
    }
}
