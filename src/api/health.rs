//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::domain::user::UserId;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
}

impl HealthResponse {
    fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of probing one dependency
#[derive(Serialize, Debug)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl HealthCheck {
    fn healthy(name: &'static str, started: Instant) -> Self {
        Self {
            name,
            status: HealthStatus::Healthy,
            message: None,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn unhealthy(name: &'static str, started: Instant, message: impl Into<String>) -> Self {
        Self {
            name,
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::from_checks(Vec::new())))
}

/// GET /ready
///
/// Ready once the account store answers and the root admin exists.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let checks = vec![check_user_store(&state).await, check_root_admin(&state).await];
    let response = HealthResponse::from_checks(checks);

    (response.status_code(), Json(response))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_user_store(state: &AppState) -> HealthCheck {
    let started = Instant::now();

    match state.user_service.count().await {
        Ok(_) => HealthCheck::healthy("user_store", started),
        Err(e) => HealthCheck::unhealthy("user_store", started, e.to_string()),
    }
}

async fn check_root_admin(state: &AppState) -> HealthCheck {
    let started = Instant::now();

    match state.user_service.find(UserId::ROOT).await {
        Ok(Some(user)) if user.is_admin() => HealthCheck::healthy("root_admin", started),
        Ok(_) => HealthCheck::unhealthy("root_admin", started, "Root admin is missing"),
        Err(e) => HealthCheck::unhealthy("root_admin", started, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_response_omits_checks() {
        let json = serde_json::to_value(HealthResponse::from_checks(Vec::new())).unwrap();

        assert_eq!(json["status"], "healthy");
        assert!(json.get("checks").is_none());
        assert!(json["version"].is_string());
    }

    #[test]
    fn test_any_failing_check_makes_service_unavailable() {
        let started = Instant::now();
        let response = HealthResponse::from_checks(vec![
            HealthCheck::healthy("user_store", started),
            HealthCheck::unhealthy("root_admin", started, "Root admin is missing"),
        ]);

        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["checks"][1]["message"], "Root admin is missing");
        assert!(json["checks"][0].get("message").is_none());
    }

    #[test]
    fn test_all_healthy() {
        let started = Instant::now();
        let response = HealthResponse::from_checks(vec![HealthCheck::healthy("user_store", started)]);

        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
