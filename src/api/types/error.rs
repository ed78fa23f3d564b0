//! Error responses in the shared envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::error;

use super::envelope::Envelope;
use crate::domain::DomainError;

/// API error with status code
///
/// `errors` is a field map for validation failures and a one element list
/// holding the message otherwise.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Value,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            errors: Value::Array(vec![Value::String(message.clone())]),
            message,
        }
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Permission error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope {
            data: Value::Array(Vec::new()),
            message: self.message,
            status: self.status.as_u16(),
            errors: self.errors,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation(errors) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: errors.summary(),
                errors: serde_json::to_value(&errors)
                    .unwrap_or_else(|_| Value::Array(Vec::new())),
            },
            DomainError::Unauthorized { message } => Self::unauthorized(message),
            DomainError::Forbidden { message } => Self::forbidden(message),
            DomainError::Internal { message } => Self::internal(message),
            DomainError::Storage { message } | DomainError::Configuration { message } => {
                error!(error = %message, "Request failed");
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationErrors;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_all_error_types() {
        assert_eq!(ApiError::unauthorized("").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("").status, StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("").status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal("").status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("User not found"), StatusCode::NOT_FOUND),
            (DomainError::unauthorized("Unauthorized"), StatusCode::UNAUTHORIZED),
            (DomainError::forbidden("nope"), StatusCode::FORBIDDEN),
            (DomainError::internal("Invalid token"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::storage("db down"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::configuration("bad"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(ApiError::from(domain_err).status, status);
        }
    }

    #[tokio::test]
    async fn test_plain_error_envelope() {
        let response = ApiError::from(DomainError::not_found("User not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "data": [],
                "message": "User not found",
                "status": 404,
                "errors": ["User not found"]
            })
        );
    }

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "The email field is required.");
        errors.add("password", "The password field is required.");
        errors.add("name", "The name field is required.");

        let response = ApiError::from(DomainError::from(errors)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["message"], "The email field is required. (and 2 more errors)");
        assert_eq!(body["status"], 422);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["errors"]["email"], json!(["The email field is required."]));
        assert_eq!(body["errors"]["name"], json!(["The name field is required."]));
    }
}
