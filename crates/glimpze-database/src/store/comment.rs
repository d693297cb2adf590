//! Comments on posts.

use async_trait::async_trait;

use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_entity::comment::Comment;

#[async_trait]
pub trait CommentStore: Send + Sync + std::fmt::Debug {
    /// Consume one `Comment` unit and insert the comment in one transaction.
    /// Fails with `NotFound` when the post does not exist.
    async fn create(&self, post_id: i64, user_id: i64, content: &str) -> AppResult<Comment>;

    /// A single comment.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>>;

    /// Comments of a post, oldest first.
    async fn list_by_post(&self, post_id: i64, page: &PageRequest) -> AppResult<Vec<Comment>>;

    /// Replace the body of a comment.
    async fn update(&self, id: i64, content: &str) -> AppResult<Comment>;

    /// Delete a comment.
    async fn delete(&self, id: i64) -> AppResult<()>;
}
