//! Endpoints acting on the caller's own account

use axum::{extract::State, routing::put, Router};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json, UserData};
use crate::infrastructure::user::{UpdatePasswordRequest, UpdateProfileRequest};

/// Create the profile router
pub fn create_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile", put(update_profile))
        .route("/password", put(update_password))
}

/// PUT /profile
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let user = state.user_service.update_profile(&actor, request).await?;

    Ok(ApiResponse::ok("Profile Updated", UserData::from(&user)))
}

/// PUT /password
pub async fn update_password(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let user = state.user_service.update_password(&actor, request).await?;

    Ok(ApiResponse::ok("Profile Password Updated", UserData::from(&user)))
}
