//! Comment CRUD.

use std::sync::Arc;

use tracing::info;

use glimpze_auth::RoleGuard;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_database::store::CommentStore;
use glimpze_entity::comment::Comment;
use glimpze_entity::user::{MODERATOR_ROLE, User};

use crate::post::service::check_text;

/// Maximum comment length in characters.
const MAX_COMMENT_LEN: usize = 2048;

/// Writes and moderates comments.
#[derive(Debug, Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    guard: RoleGuard,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(comments: Arc<dyn CommentStore>, guard: RoleGuard) -> Self {
        Self { comments, guard }
    }

    /// Comments on `post_id` as `author`, spending one `Comment` unit.
    pub async fn create(&self, author: &User, post_id: i64, content: &str) -> AppResult<Comment> {
        let content = check_text("Content", content, MAX_COMMENT_LEN)?;
        let comment = self.comments.create(post_id, author.id, &content).await?;
        info!(comment_id = comment.id, post_id, user_id = author.id, "Comment created");
        Ok(comment)
    }

    /// A comment, which must belong to `post_id`.
    pub async fn get(&self, post_id: i64, id: i64) -> AppResult<Comment> {
        self.comments
            .find_by_id(id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))
    }

    /// Comments of a post, oldest first.
    pub async fn list(&self, post_id: i64, page: &PageRequest) -> AppResult<Vec<Comment>> {
        self.comments.list_by_post(post_id, page).await
    }

    /// Rewrites a comment. The author or a moderator may edit.
    pub async fn update(
        &self,
        actor: &User,
        post_id: i64,
        id: i64,
        content: &str,
    ) -> AppResult<Comment> {
        let comment = self.get(post_id, id).await?;
        self.guard
            .require_owner_or_role(actor, comment.user_id, MODERATOR_ROLE)
            .await?;

        let content = check_text("Content", content, MAX_COMMENT_LEN)?;
        self.comments.update(id, &content).await
    }

    /// Deletes a comment. The author or a moderator may delete.
    pub async fn delete(&self, actor: &User, post_id: i64, id: i64) -> AppResult<()> {
        let comment = self.get(post_id, id).await?;
        self.guard
            .require_owner_or_role(actor, comment.user_id, MODERATOR_ROLE)
            .await?;

        self.comments.delete(id).await?;
        info!(comment_id = id, user_id = actor.id, "Comment deleted");
        Ok(())
    }
}
