//! User service implementing the account rules
//!
//! Every operation that acts on behalf of someone takes the [`Actor`]
//! explicitly. Authorization is checked first, then the target is resolved,
//! then the payload is validated as a whole before anything is written.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::password_reset::PasswordResetRepository;
use crate::domain::user::validation::{
    check_email, check_name, check_password, check_role, EMAIL_TAKEN_MESSAGE,
    MIN_PASSWORD_LENGTH, PASSWORD_MISMATCH_MESSAGE,
};
use crate::domain::user::{Actor, NewUser, User, UserId, UserPatch, UserRepository, UserRole};
use crate::domain::{DomainError, FieldInput, ValidationErrors};
use crate::infrastructure::auth::JwtGenerator;

use super::password::PasswordHasher;

pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
pub const BAD_CREDENTIALS_MESSAGE: &str = "Unauthorized";

/// Credentials submitted to log in
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: FieldInput,
    pub password: FieldInput,
}

/// Self-service sign up; any role in the payload is ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub email: FieldInput,
    pub password: FieldInput,
    pub name: FieldInput,
    pub last_name: FieldInput,
}

/// Admin account creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub email: FieldInput,
    pub password: FieldInput,
    pub name: FieldInput,
    pub last_name: FieldInput,
    pub role: FieldInput,
}

/// Admin partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub email: FieldInput,
    pub password: FieldInput,
    pub name: FieldInput,
    pub last_name: FieldInput,
    pub role: FieldInput,
}

/// Own profile update; both names are required
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: FieldInput,
    pub last_name: FieldInput,
}

/// Own password change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePasswordRequest {
    pub old_password: FieldInput,
    pub password: FieldInput,
    pub password_confirmation: FieldInput,
}

/// Root administrator seeded into an empty store
#[derive(Debug, Clone)]
pub struct RootAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
    pub last_name: String,
}

/// Token issued on a successful login
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// User service for authentication and account management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    resets: Option<Arc<dyn PasswordResetRepository>>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            hasher,
            resets: None,
        }
    }

    /// Pending reset requests to discard when an account loses its email
    pub fn with_password_resets(mut self, resets: Arc<dyn PasswordResetRepository>) -> Self {
        self.resets = Some(resets);
        self
    }

    /// Check credentials and issue a token
    pub async fn login(
        &self,
        request: LoginRequest,
        tokens: &dyn JwtGenerator,
    ) -> Result<AccessToken, DomainError> {
        let mut errors = ValidationErrors::new();
        let email = check_email(&mut errors, &request.email, true);
        let password = check_password(&mut errors, &request.password, true);
        errors.into_result()?;

        let email = email.unwrap_or_default();
        let password = password.unwrap_or_default();

        let user = self
            .repository
            .get_by_email(&email)
            .await?
            .filter(|user| self.hasher.verify(&password, user.password_hash()));

        let Some(user) = user else {
            warn!(email = %email, "Rejected login attempt");
            return Err(DomainError::unauthorized(BAD_CREDENTIALS_MESSAGE));
        };

        let token = tokens.generate(&user)?;
        info!(user_id = %user.id(), "User logged in");

        Ok(AccessToken {
            token,
            expires_in: tokens.expires_in(),
        })
    }

    /// Self-service registration, always as a normal user
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        let new_user = self
            .validate_new_user(
                &request.email,
                &request.password,
                &request.name,
                &request.last_name,
                None,
            )
            .await?;

        let user = self.repository.create(new_user).await?;
        info!(user_id = %user.id(), "User registered");

        self.refreshed(user.id()).await
    }

    /// Create an account with any role
    pub async fn create(&self, actor: &Actor, request: CreateUserRequest) -> Result<User, DomainError> {
        actor.require_admin()?;

        let new_user = self
            .validate_new_user(
                &request.email,
                &request.password,
                &request.name,
                &request.last_name,
                Some(&request.role),
            )
            .await?;

        let user = self.repository.create(new_user).await?;
        info!(
            actor_id = %actor.id(),
            user_id = %user.id(),
            role = %user.role(),
            "User created"
        );

        self.refreshed(user.id()).await
    }

    /// Get one account
    pub async fn get(&self, actor: &Actor, id: &str) -> Result<User, DomainError> {
        actor.require_admin()?;
        let id: UserId = id.parse()?;

        debug!(actor_id = %actor.id(), user_id = %id, "Getting user");
        self.existing(id).await
    }

    /// List every account in creation order
    pub async fn list(&self, actor: &Actor) -> Result<Vec<User>, DomainError> {
        actor.require_admin()?;

        debug!(actor_id = %actor.id(), "Listing users");
        self.repository.list().await
    }

    /// Apply the fields present in the request to another account
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        actor.require_admin()?;
        let id: UserId = id.parse()?;
        let target = self.existing(id).await?;

        let mut errors = ValidationErrors::new();

        let email = check_email(&mut errors, &request.email, false);
        if let Some(email) = &email {
            if email != target.email() && self.repository.email_exists(email).await? {
                errors.add("email", EMAIL_TAKEN_MESSAGE);
            }
        }

        let password = check_password(&mut errors, &request.password, false);
        let name = check_name(&mut errors, "name", &request.name, false);
        let last_name = check_name(&mut errors, "last_name", &request.last_name, false);
        let role = check_role(&mut errors, &request.role, false);
        errors.into_result()?;

        let password_hash = password.map(|p| self.hasher.hash(&p)).transpose()?;
        let email_changed = email.as_deref().is_some_and(|e| e != target.email());

        let patch = UserPatch {
            email,
            password_hash,
            name,
            last_name,
            role,
        };

        self.apply(id, patch).await?;
        if email_changed {
            self.discard_pending_reset(target.email()).await?;
        }
        info!(actor_id = %actor.id(), user_id = %id, "User updated");

        self.refreshed(id).await
    }

    /// Permanently remove another account
    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), DomainError> {
        actor.require_admin()?;
        let id: UserId = id.parse()?;
        let target = self.existing(id).await?;

        if let Err(e) = actor.ensure_can_delete(id) {
            warn!(actor_id = %actor.id(), user_id = %id, "Refused user deletion");
            return Err(e);
        }

        if !self.repository.delete(&id).await? {
            return Err(DomainError::not_found(USER_NOT_FOUND_MESSAGE));
        }
        self.discard_pending_reset(target.email()).await?;

        info!(actor_id = %actor.id(), user_id = %id, "User deleted");
        Ok(())
    }

    /// Change the caller's own first and last name
    pub async fn update_profile(
        &self,
        actor: &Actor,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut errors = ValidationErrors::new();
        let name = check_name(&mut errors, "name", &request.name, true);
        let last_name = check_name(&mut errors, "last_name", &request.last_name, true);
        errors.into_result()?;

        let patch = UserPatch {
            name,
            last_name,
            ..Default::default()
        };

        self.apply(actor.id(), patch).await?;
        info!(user_id = %actor.id(), "Profile updated");

        self.refreshed(actor.id()).await
    }

    /// Change the caller's own password after proving the current one
    pub async fn update_password(
        &self,
        actor: &Actor,
        request: UpdatePasswordRequest,
    ) -> Result<User, DomainError> {
        let current = self.existing(actor.id()).await?;

        let mut errors = ValidationErrors::new();

        let old_password = errors
            .check("old_password", &request.old_password)
            .required()
            .string()
            .value();
        if let Some(old_password) = &old_password {
            if !self.hasher.verify(old_password, current.password_hash()) {
                errors.add("old_password", PASSWORD_MISMATCH_MESSAGE);
            }
        }

        let password = errors
            .check("password", &request.password)
            .required()
            .string()
            .min(MIN_PASSWORD_LENGTH)
            .confirmed(&request.password_confirmation)
            .value();
        errors.into_result()?;

        let patch = UserPatch {
            password_hash: Some(self.hasher.hash(&password.unwrap_or_default())?),
            ..Default::default()
        };

        self.apply(actor.id(), patch).await?;
        info!(user_id = %actor.id(), "Password changed");

        self.refreshed(actor.id()).await
    }

    /// Look up an account without authorization, for token resolution
    pub async fn find(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(&id).await
    }

    /// Count stored accounts
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Seed the root administrator when the store is empty
    pub async fn ensure_root_admin(&self, admin: RootAdmin) -> Result<Option<User>, DomainError> {
        if self.repository.count().await? > 0 {
            return Ok(None);
        }

        let new_user = NewUser {
            email: admin.email,
            password_hash: self.hasher.hash(&admin.password)?,
            name: admin.name,
            last_name: admin.last_name,
            role: UserRole::Admin,
        };

        let user = self.repository.create_root(new_user).await?;
        info!(user_id = %user.id(), email = %user.email(), "Root admin created");

        Ok(Some(user))
    }

    /// Validate every field of a new account, hashing the password last
    async fn validate_new_user(
        &self,
        email: &FieldInput,
        password: &FieldInput,
        name: &FieldInput,
        last_name: &FieldInput,
        role: Option<&FieldInput>,
    ) -> Result<NewUser, DomainError> {
        let mut errors = ValidationErrors::new();

        let email = check_email(&mut errors, email, true);
        if let Some(email) = &email {
            if self.repository.email_exists(email).await? {
                errors.add("email", EMAIL_TAKEN_MESSAGE);
            }
        }

        let password = check_password(&mut errors, password, true);
        let name = check_name(&mut errors, "name", name, true);
        let last_name = check_name(&mut errors, "last_name", last_name, true);
        let role = match role {
            Some(input) => check_role(&mut errors, input, true),
            None => Some(UserRole::Normal),
        };
        errors.into_result()?;

        Ok(NewUser {
            email: email.unwrap_or_default(),
            password_hash: self.hasher.hash(&password.unwrap_or_default())?,
            name: name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            role: role.unwrap_or_default(),
        })
    }

    /// Reset links must not outlive the account's ownership of the address
    async fn discard_pending_reset(&self, email: &str) -> Result<(), DomainError> {
        if let Some(resets) = &self.resets {
            if resets.delete(email).await? {
                debug!(email = %email, "Discarded pending password reset");
            }
        }
        Ok(())
    }

    async fn existing(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND_MESSAGE))
    }

    async fn apply(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        self.repository
            .update(&id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND_MESSAGE))
    }

    /// Re-read an account so responses reflect the stored state
    async fn refreshed(&self, id: UserId) -> Result<User, DomainError> {
        self.existing(id).await
    }
}
