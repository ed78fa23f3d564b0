//! Authentication API endpoints
//!
//! Login, self-service registration and the password reset flow. None of
//! these require a token.

use axum::{
    extract::{Query, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json, UserData};
use crate::infrastructure::password_reset::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::infrastructure::user::{LoginRequest, RegisterUserRequest};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register-user", post(register_user))
        .route(
            "/reset-password",
            post(request_password_reset).put(reset_password),
        )
}

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// Query string of the reset link
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetTokenQuery {
    pub token: String,
}

/// Login with email and password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<TokenData>, ApiError> {
    let token = state
        .user_service
        .login(request, state.jwt_service.as_ref())
        .await?;

    Ok(ApiResponse::ok(
        "Access Granted",
        TokenData {
            token: token.token,
            expires_in: token.expires_in,
        },
    ))
}

/// Register a new normal account
///
/// POST /register-user
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let user = state.user_service.register(request).await?;

    Ok(ApiResponse::created("User Registered", UserData::from(&user)))
}

/// Send a reset link to an account holder
///
/// POST /reset-password
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<ApiResponse<Vec<()>>, ApiError> {
    state.password_reset_service.request_reset(request).await?;

    Ok(ApiResponse::empty("OK"))
}

/// Set a new password using the token from a reset link
///
/// PUT /reset-password?token=...
pub async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<ResetTokenQuery>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    debug!("Completing password reset");
    let user = state
        .password_reset_service
        .reset(&query.token, request)
        .await?;

    Ok(ApiResponse::ok("Password Reset", UserData::from(&user)))
}
