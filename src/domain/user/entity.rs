//! User entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::INVALID_ID_MESSAGE;
use crate::domain::DomainError;

/// Numeric user identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// The root administrator, which can never be deleted
    pub const ROOT: UserId = UserId(1);

    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::invalid_field("id", INVALID_ID_MESSAGE))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    #[default]
    Normal,
}

impl UserRole {
    /// Wire names accepted for a role
    pub const NAMES: [&'static str; 2] = ["ADMIN", "NORMAL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Normal => "NORMAL",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "NORMAL" => Ok(Self::Normal),
            _ => Err(DomainError::invalid_field(
                "role",
                "The selected role is invalid.",
            )),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// Typed partial update; only `Some` fields are applied
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    name: String,
    last_name: String,
    role: UserRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Materialize a freshly stored account
    pub fn new(id: UserId, user: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            last_name: user.last_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an account read back from storage
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        email: String,
        password_hash: String,
        name: String,
        last_name: String,
        role: UserRole,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            name,
            last_name,
            role,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Apply the present fields of a patch
    pub fn apply(&mut self, patch: UserPatch) {
        if patch.is_empty() {
            return;
        }

        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }

        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(id: i64, email: &str) -> User {
        User::new(
            UserId::new(id),
            NewUser {
                email: email.to_string(),
                password_hash: "hashed_password".to_string(),
                name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                role: UserRole::Normal,
            },
        )
    }

    #[test]
    fn test_user_id_parse() {
        let id: UserId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
        assert!(!id.is_root());
        assert!("1".parse::<UserId>().unwrap().is_root());
    }

    #[test]
    fn test_user_id_parse_invalid() {
        let err = "abc".parse::<UserId>().unwrap_err();

        match err {
            DomainError::Validation(errors) => {
                assert_eq!(
                    errors.get("id").unwrap(),
                    &["The id field must be an integer.".to_string()]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_role_names() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("NORMAL".parse::<UserRole>().unwrap(), UserRole::Normal);
        assert!("admin".parse::<UserRole>().is_err());
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user(2, "jane@example.com");

        assert_eq!(user.id().value(), 2);
        assert_eq!(user.email(), "jane@example.com");
        assert_eq!(user.role(), UserRole::Normal);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut user = create_test_user(2, "jane@example.com");
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.apply(UserPatch {
            name: Some("Janet".to_string()),
            role: Some(UserRole::Admin),
            ..Default::default()
        });

        assert_eq!(user.name(), "Janet");
        assert_eq!(user.last_name(), "Doe");
        assert_eq!(user.email(), "jane@example.com");
        assert!(user.is_admin());
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let mut user = create_test_user(2, "jane@example.com");
        let original_updated = user.updated_at();

        user.apply(UserPatch::default());
        assert_eq!(user.updated_at(), original_updated);
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user(2, "jane@example.com");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }
}
