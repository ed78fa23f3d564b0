//! User authentication extractor using JWT tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::{Actor, UNAUTHORIZED_ACTION_MESSAGE};

/// Extractor that requires a valid JWT token
///
/// Extracts the JWT token from the `Authorization: Bearer <jwt_token>` header
/// and resolves the account it was issued for. The role is taken from the
/// stored account, not from the token. Every failure is reported as
/// forbidden.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Actor);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers).ok_or_else(denied)?;

        let claims = state.jwt_service.validate(&token).map_err(|e| {
            debug!(error = %e, "Rejected JWT");
            denied()
        })?;

        let user_id = claims.user_id().map_err(|_| denied())?;

        let user = state.user_service.find(user_id).await?.ok_or_else(|| {
            debug!(user_id = %user_id, "Token subject no longer exists");
            denied()
        })?;

        Ok(RequireUser(Actor::from(&user)))
    }
}

fn denied() -> ApiError {
    ApiError::forbidden(UNAUTHORIZED_ACTION_MESSAGE)
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
