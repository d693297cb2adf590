//! Feed handler.

use axum::Json;
use axum::extract::{Query, State};

use glimpze_entity::post::FeedItem;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{OptionalAuthUser, PaginationParams};
use crate::state::AppState;

/// GET /v1/feed
///
/// Signed-in users get their own and followed authors' posts, newest
/// first. Anonymous callers get the public feed, most liked first.
pub async fn feed(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<FeedItem>>>, ApiError> {
    let items = state
        .feed
        .feed(viewer.as_ref(), &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(items)))
}
