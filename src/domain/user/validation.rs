//! User field rules and messages

use crate::domain::validation::{FieldInput, ValidationErrors};

use super::entity::UserRole;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum length for first and last names
pub const MIN_NAME_LENGTH: usize = 2;

pub const INVALID_ID_MESSAGE: &str = "The id field must be an integer.";
pub const EMAIL_TAKEN_MESSAGE: &str = "The email has already been taken.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The password does not match.";
pub const UNKNOWN_EMAIL_MESSAGE: &str = "The selected email is invalid.";

/// email: required|string|email
pub fn check_email(errors: &mut ValidationErrors, input: &FieldInput, required: bool) -> Option<String> {
    let rules = errors.check("email", input);
    let rules = if required { rules.required() } else { rules };
    rules.string().email().value()
}

/// password: required|min:8|string
pub fn check_password(errors: &mut ValidationErrors, input: &FieldInput, required: bool) -> Option<String> {
    let rules = errors.check("password", input);
    let rules = if required { rules.required() } else { rules };
    rules.min(MIN_PASSWORD_LENGTH).string().value()
}

/// name / last_name: required|min:2|string
pub fn check_name(
    errors: &mut ValidationErrors,
    field: &'static str,
    input: &FieldInput,
    required: bool,
) -> Option<String> {
    let rules = errors.check(field, input);
    let rules = if required { rules.required() } else { rules };
    rules.min(MIN_NAME_LENGTH).string().value()
}

/// role: required|in:ADMIN,NORMAL
pub fn check_role(errors: &mut ValidationErrors, input: &FieldInput, required: bool) -> Option<UserRole> {
    let rules = errors.check("role", input);
    let rules = if required { rules.required() } else { rules };
    rules
        .one_of(&UserRole::NAMES)
        .value()
        .and_then(|role| role.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_email() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            check_email(&mut errors, &FieldInput::text("jane@example.com"), true).as_deref(),
            Some("jane@example.com")
        );
        assert!(errors.is_empty());

        assert!(check_email(&mut errors, &FieldInput::text("not-an-email"), true).is_none());
        assert_eq!(
            errors.get("email").unwrap(),
            &["The email field must be a valid email address.".to_string()]
        );
    }

    #[test]
    fn test_check_email_optional() {
        let mut errors = ValidationErrors::new();
        assert!(check_email(&mut errors, &FieldInput::Missing, false).is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_password_too_short() {
        let mut errors = ValidationErrors::new();
        assert!(check_password(&mut errors, &FieldInput::text("asd"), true).is_none());
        assert_eq!(
            errors.get("password").unwrap(),
            &["The password field must be at least 8 characters.".to_string()]
        );
    }

    #[test]
    fn test_check_name_not_string() {
        let mut errors = ValidationErrors::new();
        let input = FieldInput::Other(json!(["x", "y"]));
        assert!(check_name(&mut errors, "name", &input, true).is_none());
        assert_eq!(
            errors.get("name").unwrap(),
            &["The name field must be a string.".to_string()]
        );
    }

    #[test]
    fn test_check_role() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            check_role(&mut errors, &FieldInput::text("ADMIN"), true),
            Some(UserRole::Admin)
        );
        assert!(check_role(&mut errors, &FieldInput::Missing, true).is_none());
        assert_eq!(
            errors.get("role").unwrap(),
            &["The role field is required.".to_string()]
        );
    }
}
