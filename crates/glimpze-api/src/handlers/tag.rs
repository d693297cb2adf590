//! Tag vocabulary and post tagging handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use glimpze_entity::post::Post;
use glimpze_entity::tag::{PostTag, Tag};

use crate::dto::request::TagRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// POST /v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TagRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tag>>), ApiError> {
    let tag = state.tags.create(&auth, &req.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tag))))
}

/// GET /v1/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Tag>>, ApiError> {
    let tag = state.tags.get(id).await?;
    Ok(Json(ApiResponse::ok(tag)))
}

/// DELETE /v1/tags/{id}
pub async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.tags.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/tags/{name}/posts
pub async fn list_tagged_posts(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Post>>>, ApiError> {
    let posts = state
        .posts
        .list_by_tag(&name, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(posts)))
}

/// GET /v1/posts/{id}/tags
pub async fn list_post_tags(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PostTag>>>, ApiError> {
    let tags = state.tags.list_for_post(post_id).await?;
    Ok(Json(ApiResponse::ok(tags)))
}

/// POST /v1/posts/{id}/tags
pub async fn attach_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<TagRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostTag>>), ApiError> {
    let tag = state.tags.attach(&auth, post_id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tag))))
}

/// DELETE /v1/posts/{id}/tags/{tag_id}
pub async fn detach_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((post_id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.tags.detach(&auth, post_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
