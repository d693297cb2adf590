//! Post CRUD with attachment upload and cleanup.
//!
//! Blobs are written before the database rows that reference them. When
//! the database write fails the fresh blobs are deleted again; when rows
//! are removed their blobs are deleted after the commit.

use std::sync::Arc;

use tracing::{info, warn};

use glimpze_auth::RoleGuard;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_database::store::{PostStore, PostUpdate};
use glimpze_entity::post::{NewPost, NewPostFile, Post, PostFile};
use glimpze_entity::user::{ADMIN_ROLE, MODERATOR_ROLE, QuotaKind, User};
use glimpze_storage::{StorageManager, UploadPolicy, UploadedFile, ValidatedUpload};

/// Maximum title length in characters.
const MAX_TITLE_LEN: usize = 100;
/// Maximum body length in characters.
const MAX_CONTENT_LEN: usize = 2048;

/// A new post as submitted.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub files: Vec<UploadedFile>,
}

/// Changes to a post. `files: Some(..)` replaces every attachment.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub files: Option<Vec<UploadedFile>>,
}

/// Creates, reads, edits, and deletes posts.
#[derive(Debug, Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    storage: StorageManager,
    policy: UploadPolicy,
    guard: RoleGuard,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(
        posts: Arc<dyn PostStore>,
        storage: StorageManager,
        policy: UploadPolicy,
        guard: RoleGuard,
    ) -> Self {
        Self {
            posts,
            storage,
            policy,
            guard,
        }
    }

    /// Publishes a post for `author`, spending one `CreatePost` unit.
    pub async fn create(&self, author: &User, draft: PostDraft) -> AppResult<Post> {
        let title = check_text("Title", &draft.title, MAX_TITLE_LEN)?;
        let content = check_text("Content", &draft.content, MAX_CONTENT_LEN)?;

        // Fail fast before uploading. The store's guarded decrement is the
        // authoritative check.
        if author.limits.remaining(QuotaKind::CreatePost) <= 0 {
            return Err(quota_exhausted(QuotaKind::CreatePost));
        }

        let uploads = self.policy.validate(draft.files)?;
        let files = self.upload(&uploads).await?;
        let keys: Vec<String> = files.iter().map(NewPostFile::blob_key).collect();

        let new_post = NewPost {
            user_id: author.id,
            title,
            content,
            files,
        };

        match self.posts.create(&new_post).await {
            Ok(post) => {
                info!(post_id = post.id, user_id = author.id, files = keys.len(), "Post created");
                Ok(post)
            }
            Err(e) => {
                self.storage.delete_quietly(&keys).await;
                Err(e)
            }
        }
    }

    /// A single post.
    pub async fn get(&self, id: i64) -> AppResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))
    }

    /// Edits a post. The author or a moderator may edit.
    pub async fn update(&self, actor: &User, id: i64, edit: PostEdit) -> AppResult<Post> {
        let post = self.get(id).await?;
        self.guard
            .require_owner_or_role(actor, post.user_id, MODERATOR_ROLE)
            .await?;

        let title = edit
            .title
            .as_deref()
            .map(|t| check_text("Title", t, MAX_TITLE_LEN))
            .transpose()?;
        let content = edit
            .content
            .as_deref()
            .map(|c| check_text("Content", c, MAX_CONTENT_LEN))
            .transpose()?;

        let files = match edit.files {
            Some(files) => {
                let uploads = self.policy.validate(files)?;
                Some(self.upload(&uploads).await?)
            }
            None => None,
        };
        let new_keys: Vec<String> = files
            .iter()
            .flatten()
            .map(NewPostFile::blob_key)
            .collect();

        let update = PostUpdate {
            title,
            content,
            files,
        };

        match self.posts.update(id, &update).await {
            Ok(updated) => {
                self.storage
                    .delete_quietly(&blob_keys(&updated.removed_files))
                    .await;
                info!(post_id = id, user_id = actor.id, "Post updated");
                Ok(updated.post)
            }
            Err(e) => {
                self.storage.delete_quietly(&new_keys).await;
                Err(e)
            }
        }
    }

    /// Deletes a post. The author or an admin may delete.
    pub async fn delete(&self, actor: &User, id: i64) -> AppResult<()> {
        let post = self.get(id).await?;
        self.guard
            .require_owner_or_role(actor, post.user_id, ADMIN_ROLE)
            .await?;

        let removed = self.posts.delete(id).await?;
        self.storage.delete_quietly(&blob_keys(&removed)).await;

        info!(post_id = id, user_id = actor.id, "Post deleted");
        Ok(())
    }

    /// Posts of one author, newest first.
    pub async fn list_by_user(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<Post>> {
        self.posts.list_by_user(user_id, page).await
    }

    /// Posts carrying the tag `name`, newest first.
    pub async fn list_by_tag(&self, name: &str, page: &PageRequest) -> AppResult<Vec<Post>> {
        self.posts
            .list_by_tag(&name.trim().to_lowercase(), page)
            .await
    }

    /// Writes every upload to the blob store. On failure the blobs written
    /// so far are deleted.
    async fn upload(&self, uploads: &[ValidatedUpload]) -> AppResult<Vec<NewPostFile>> {
        let mut written = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let key = upload.key();
            if let Err(e) = self
                .storage
                .put(&key, upload.data.clone(), upload.content_type)
                .await
            {
                warn!(key = %key, error = %e, "Upload failed, removing earlier blobs");
                self.storage.delete_quietly(&written).await;
                return Err(e);
            }
            written.push(key);
        }

        Ok(uploads
            .iter()
            .map(|u| NewPostFile {
                file_id: u.file_id,
                file_extension: u.extension.clone(),
                original_filename: u.original_filename.clone(),
            })
            .collect())
    }
}

pub(crate) fn check_text(field: &str, value: &str, max: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

pub(crate) fn quota_exhausted(kind: QuotaKind) -> AppError {
    AppError::quota_exhausted(format!("Daily {kind} limit reached"))
}

fn blob_keys(files: &[PostFile]) -> Vec<String> {
    files.iter().map(PostFile::blob_key).collect()
}
