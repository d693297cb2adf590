//! Post CRUD handlers. Create and edit take `multipart/form-data` with
//! `title`, `content`, and up to four `file` parts.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;

use glimpze_core::error::AppError;
use glimpze_entity::post::Post;
use glimpze_service::{PostDraft, PostEdit};
use glimpze_storage::UploadedFile;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Fields collected from a post form.
#[derive(Debug, Default)]
struct PostForm {
    title: Option<String>,
    content: Option<String>,
    files: Vec<UploadedFile>,
}

async fn read_form(mut multipart: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" | "content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid {name} field: {e}")))?;
                if name == "title" {
                    form.title = Some(text);
                } else {
                    form.content = Some(text);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid file part: {e}")))?;
                form.files.push(UploadedFile { filename, data });
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// POST /v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Post>>), ApiError> {
    let form = read_form(multipart).await?;
    let draft = PostDraft {
        title: form.title.unwrap_or_default(),
        content: form.content.unwrap_or_default(),
        files: form.files,
    };

    let post = state.posts.create(&auth, draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// GET /v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let post = state.posts.get(id).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// PATCH /v1/posts/{id}
///
/// Any `file` part replaces the full attachment set; without one the
/// attachments are kept.
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let form = read_form(multipart).await?;
    let edit = PostEdit {
        title: form.title,
        content: form.content,
        files: (!form.files.is_empty()).then_some(form.files),
    };

    let post = state.posts.update(&auth, id, edit).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// DELETE /v1/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/posts/users/{user_id}
pub async fn list_user_posts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Post>>>, ApiError> {
    let posts = state
        .posts
        .list_by_user(user_id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(posts)))
}
