//! User profile and role handlers.

use axum::Json;
use axum::extract::{Path, State};

use glimpze_entity::user::{User, UserProfile};
use glimpze_service::UserDetails;

use crate::dto::request::{UpdateProfileRequest, UpdateRoleRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /v1/users/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserDetails>>, ApiError> {
    let details = state.users.details(user).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// GET /v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserDetails>>, ApiError> {
    let details = state.users.get(id).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// PATCH /v1/users/me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.users.update_profile(&auth, &req.biodata).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PATCH /v1/users/{name}/role
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(name): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.users.update_role(&auth, &name, &req.role).await?;
    Ok(Json(ApiResponse::ok(user)))
}
