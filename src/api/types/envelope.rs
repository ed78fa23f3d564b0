//! Response envelope shared by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Wire shape of every response body
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    pub message: String,
    pub status: u16,
    pub errors: Value,
}

/// Successful response wrapped in the envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    message: String,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }

    /// 200 response
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    /// 201 response
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }
}

impl ApiResponse<Vec<()>> {
    /// 200 response whose data is an empty list
    pub fn empty(message: impl Into<String>) -> Self {
        Self::ok(message, Vec::new())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            data: self.data,
            message: self.message,
            status: self.status.as_u16(),
            errors: Value::Array(Vec::new()),
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ok_envelope() {
        let response = ApiResponse::ok("OK", json!({"users": []})).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"data": {"users": []}, "message": "OK", "status": 200, "errors": []})
        );
    }

    #[tokio::test]
    async fn test_created_status() {
        let response = ApiResponse::created("User Created", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["status"], 201);
    }

    #[tokio::test]
    async fn test_empty_data_is_list() {
        let body = body_json(ApiResponse::empty("User Deleted").into_response()).await;
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["message"], "User Deleted");
    }
}
