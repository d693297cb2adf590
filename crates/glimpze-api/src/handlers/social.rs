//! Likes and follows.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use glimpze_entity::social::{Follower, PostLike};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /v1/posts/{id}/likes
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<PostLike>>), ApiError> {
    let like = state.social.like(&auth, post_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(like))))
}

/// DELETE /v1/posts/{id}/likes
pub async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.social.unlike(&auth, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/users/{id}/follow
pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<Follower>>), ApiError> {
    let follow = state.social.follow(&auth, user_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(follow))))
}

/// DELETE /v1/users/{id}/follow
pub async fn unfollow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.social.unfollow(&auth, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
