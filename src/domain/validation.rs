//! Field-level input validation
//!
//! Request payloads arrive as loosely typed JSON. Each field is captured as a
//! [`FieldInput`] and checked by a chain of rules that record human readable
//! messages per field in [`ValidationErrors`].

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use validator::ValidateEmail;

use super::DomainError;

/// Raw value of a single request field
///
/// `null` and the empty string are treated the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum FieldInput {
    #[default]
    Missing,
    Text(String),
    Other(Value),
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        Self::from(Value::String(value.into()))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Length used by size rules; only strings and numbers have one
    fn measured_len(&self) -> Option<usize> {
        match self {
            Self::Text(value) => Some(value.chars().count()),
            Self::Other(Value::Number(n)) => Some(n.to_string().len()),
            _ => None,
        }
    }
}

impl From<Value> for FieldInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::String(s) if s.is_empty() => Self::Missing,
            Value::String(s) => Self::Text(s),
            other => Self::Other(other),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

/// Validation messages grouped by field, in the order they were recorded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();

        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .first()
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// First message, suffixed with the number of remaining ones
    pub fn summary(&self) -> String {
        let Some(first) = self.first_message() else {
            return "The given data was invalid.".to_string();
        };

        match self.len() - 1 {
            0 => first.to_string(),
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    /// Start a rule chain for one field
    pub fn check<'a>(&'a mut self, field: &'static str, input: &'a FieldInput) -> FieldRules<'a> {
        FieldRules {
            errors: self,
            field,
            input,
            failed: false,
        }
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;

        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }

        map.end()
    }
}

/// Human readable name of a field
pub fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// Ordered rule chain for a single field
///
/// Every rule except [`FieldRules::required`] is skipped when the field is
/// absent. Rules keep running after a failure so that all messages for the
/// field are reported together.
pub struct FieldRules<'a> {
    errors: &'a mut ValidationErrors,
    field: &'static str,
    input: &'a FieldInput,
    failed: bool,
}

impl<'a> FieldRules<'a> {
    fn fail(&mut self, message: String) {
        self.errors.add(self.field, message);
        self.failed = true;
    }

    fn label(&self) -> String {
        field_label(self.field)
    }

    pub fn required(mut self) -> Self {
        if self.input.is_missing() {
            let message = format!("The {} field is required.", self.label());
            self.fail(message);
        }
        self
    }

    pub fn string(mut self) -> Self {
        if matches!(self.input, FieldInput::Other(_)) {
            let message = format!("The {} field must be a string.", self.label());
            self.fail(message);
        }
        self
    }

    pub fn email(mut self) -> Self {
        let valid = match self.input {
            FieldInput::Missing => true,
            FieldInput::Text(value) => value.validate_email(),
            FieldInput::Other(_) => false,
        };

        if !valid {
            let message = format!("The {} field must be a valid email address.", self.label());
            self.fail(message);
        }
        self
    }

    pub fn min(mut self, min: usize) -> Self {
        if let Some(len) = self.input.measured_len() {
            if len < min {
                let message = format!(
                    "The {} field must be at least {} characters.",
                    self.label(),
                    min
                );
                self.fail(message);
            }
        }
        self
    }

    pub fn one_of(mut self, allowed: &[&str]) -> Self {
        let valid = match self.input {
            FieldInput::Missing => true,
            FieldInput::Text(value) => allowed.contains(&value.as_str()),
            FieldInput::Other(_) => false,
        };

        if !valid {
            let message = format!("The selected {} is invalid.", self.label());
            self.fail(message);
        }
        self
    }

    /// Must equal the companion confirmation field
    pub fn confirmed(mut self, confirmation: &FieldInput) -> Self {
        if let FieldInput::Text(value) = self.input {
            if confirmation.as_text() != Some(value.as_str()) {
                let message = format!("The {} field confirmation does not match.", self.label());
                self.fail(message);
            }
        }
        self
    }

    /// The text value, when present and every rule passed
    pub fn value(self) -> Option<String> {
        if self.failed {
            return None;
        }
        self.input.as_text().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        email: FieldInput,
        #[serde(default)]
        name: FieldInput,
    }

    #[test]
    fn test_field_input_from_json() {
        let payload: Payload = serde_json::from_value(json!({"email": 1})).unwrap();
        assert_eq!(payload.email, FieldInput::Other(json!(1)));
        assert!(payload.name.is_missing());

        let payload: Payload = serde_json::from_value(json!({"email": "", "name": null})).unwrap();
        assert!(payload.email.is_missing());
        assert!(payload.name.is_missing());

        let payload: Payload = serde_json::from_value(json!({"email": "a@b.com"})).unwrap();
        assert_eq!(payload.email.as_text(), Some("a@b.com"));
    }

    #[test]
    fn test_required_stops_other_rules() {
        let mut errors = ValidationErrors::new();
        let value = errors
            .check("email", &FieldInput::Missing)
            .required()
            .string()
            .email()
            .value();

        assert!(value.is_none());
        assert_eq!(
            errors.get("email").unwrap(),
            &["The email field is required.".to_string()]
        );
    }

    #[test]
    fn test_non_string_email_reports_both_messages() {
        let mut errors = ValidationErrors::new();
        let input = FieldInput::Other(json!(1));
        errors.check("email", &input).required().string().email();

        assert_eq!(
            errors.get("email").unwrap(),
            &[
                "The email field must be a string.".to_string(),
                "The email field must be a valid email address.".to_string(),
            ]
        );
    }

    #[test]
    fn test_min_uses_label() {
        let mut errors = ValidationErrors::new();
        let input = FieldInput::text("a");
        errors.check("last_name", &input).required().min(2).string();

        assert_eq!(
            errors.get("last_name").unwrap(),
            &["The last name field must be at least 2 characters.".to_string()]
        );
    }

    #[test]
    fn test_numeric_password_is_measured_but_not_a_string() {
        let mut errors = ValidationErrors::new();
        let input = FieldInput::Other(json!(12345678));
        errors.check("password", &input).required().min(8).string();

        assert_eq!(
            errors.get("password").unwrap(),
            &["The password field must be a string.".to_string()]
        );
    }

    #[test]
    fn test_one_of() {
        let mut errors = ValidationErrors::new();
        let input = FieldInput::text("ROOT");
        errors.check("role", &input).required().one_of(&["ADMIN", "NORMAL"]);

        assert_eq!(
            errors.get("role").unwrap(),
            &["The selected role is invalid.".to_string()]
        );
    }

    #[test]
    fn test_confirmed() {
        let mut errors = ValidationErrors::new();
        let password = FieldInput::text("newpassword");
        let confirmation = FieldInput::text("otherpassword");
        let value = errors
            .check("password", &password)
            .required()
            .confirmed(&confirmation)
            .value();

        assert!(value.is_none());
        assert_eq!(
            errors.get("password").unwrap(),
            &["The password field confirmation does not match.".to_string()]
        );

        let mut errors = ValidationErrors::new();
        let same = FieldInput::text("newpassword");
        let value = errors.check("password", &password).confirmed(&same).value();
        assert_eq!(value.as_deref(), Some("newpassword"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_optional_field_skips_rules() {
        let mut errors = ValidationErrors::new();
        let value = errors
            .check("name", &FieldInput::Missing)
            .string()
            .min(2)
            .value();

        assert!(value.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_summary_and_serialization_order() {
        let mut errors = ValidationErrors::new();
        errors.add("password", "The password field is required.");
        errors.add("email", "The email field is required.");
        errors.add("email", "The email field must be a string.");

        assert_eq!(
            errors.summary(),
            "The password field is required. (and 2 more errors)"
        );

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(
            json,
            r#"{"password":["The password field is required."],"email":["The email field is required.","The email field must be a string."]}"#
        );
    }

    #[test]
    fn test_summary_single_extra() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "a");
        errors.add("last_name", "b");
        assert_eq!(errors.summary(), "a (and 1 more error)");
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("email", "The email has already been taken.");
        assert!(matches!(
            errors.into_result(),
            Err(DomainError::Validation(_))
        ));
    }
}
