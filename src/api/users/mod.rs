//! Account administration endpoints
//!
//! All of them require an administrator token; the role check itself lives
//! in the user service.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json, UserData, UserListData, UserResponse};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Create the account administration router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
) -> Result<ApiResponse<UserListData>, ApiError> {
    let users = state.user_service.list(&actor).await?;

    Ok(ApiResponse::ok(
        "OK",
        UserListData {
            users: users.iter().map(UserResponse::from).collect(),
        },
    ))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let user = state.user_service.get(&actor, &id).await?;

    Ok(ApiResponse::ok("OK", UserData::from(&user)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let user = state.user_service.create(&actor, request).await?;

    Ok(ApiResponse::created("User Created", UserData::from(&user)))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<ApiResponse<UserData>, ApiError> {
    let user = state.user_service.update(&actor, &id, request).await?;

    Ok(ApiResponse::ok("User Updated", UserData::from(&user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUser(actor): RequireUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<()>>, ApiError> {
    state.user_service.delete(&actor, &id).await?;

    Ok(ApiResponse::empty("User Deleted"))
}
