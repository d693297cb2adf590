//! Comment handlers, nested under a post.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use glimpze_entity::comment::Comment;

use crate::dto::request::CommentRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /v1/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, ApiError> {
    let comments = state
        .comments
        .list(post_id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(comments)))
}

/// POST /v1/posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>), ApiError> {
    let comment = state.comments.create(&auth, post_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment))))
}

/// GET /v1/posts/{id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<Comment>>, ApiError> {
    let comment = state.comments.get(post_id, id).await?;
    Ok(Json(ApiResponse::ok(comment)))
}

/// PATCH /v1/posts/{id}/comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((post_id, id)): Path<(i64, i64)>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<Json<ApiResponse<Comment>>, ApiError> {
    let comment = state
        .comments
        .update(&auth, post_id, id, &req.content)
        .await?;
    Ok(Json(ApiResponse::ok(comment)))
}

/// DELETE /v1/posts/{id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.comments.delete(&auth, post_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
