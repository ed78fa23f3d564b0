//! Account payloads

use serde::Serialize;

use crate::domain::user::{User, UserRole};

/// Account as exposed over HTTP; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            name: user.name().to_string(),
            last_name: user.last_name().to_string(),
            email: user.email().to_string(),
            role: user.role(),
        }
    }
}

/// `data` of single-account responses
#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: UserResponse,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            user: UserResponse::from(user),
        }
    }
}

/// `data` of the account listing
#[derive(Debug, Serialize)]
pub struct UserListData {
    pub users: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, UserId};
    use serde_json::json;

    #[test]
    fn test_user_response_shape() {
        let user = User::new(
            UserId::new(2),
            NewUser {
                email: "juan@gmail.com".to_string(),
                password_hash: "secret-hash".to_string(),
                name: "Juan".to_string(),
                last_name: "Hernandez".to_string(),
                role: UserRole::Normal,
            },
        );

        let value = serde_json::to_value(UserData::from(&user)).unwrap();
        assert_eq!(
            value,
            json!({"user": {
                "id": 2,
                "name": "Juan",
                "last_name": "Hernandez",
                "email": "juan@gmail.com",
                "role": "NORMAL"
            }})
        );
    }
}
