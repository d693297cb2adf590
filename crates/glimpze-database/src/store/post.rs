//! Posts and their attachments.

use async_trait::async_trait;

use glimpze_core::result::AppResult;
use glimpze_core::types::PageRequest;
use glimpze_entity::post::{FeedItem, NewPost, NewPostFile, Post, PostFile};

/// Changes applied by [`PostStore::update`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// Replacement attachment set.
    pub files: Option<Vec<NewPostFile>>,
}

/// Result of an update: the new post and any attachments it replaced.
#[derive(Debug, Clone)]
pub struct UpdatedPost {
    /// The post after the update.
    pub post: Post,
    /// Attachments whose rows were removed; their blobs are now orphaned.
    pub removed_files: Vec<PostFile>,
}

#[async_trait]
pub trait PostStore: Send + Sync + std::fmt::Debug {
    /// Consume one `CreatePost` unit of the author's quota and insert the
    /// post with its attachments, all in one transaction.
    async fn create(&self, post: &NewPost) -> AppResult<Post>;

    /// A single post.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>>;

    /// Posts of one author, newest first.
    async fn list_by_user(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<Post>>;

    /// Posts carrying a tag, newest first.
    async fn list_by_tag(&self, tag_name: &str, page: &PageRequest) -> AppResult<Vec<Post>>;

    /// Posts by the user and by everyone the user follows, newest first.
    async fn user_feed(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<FeedItem>>;

    /// All posts, most liked first, then newest.
    async fn public_feed(&self, page: &PageRequest) -> AppResult<Vec<FeedItem>>;

    /// Apply an update. Fails with `NotFound` for an unknown post.
    async fn update(&self, id: i64, update: &PostUpdate) -> AppResult<UpdatedPost>;

    /// Delete a post and return the attachments it had.
    async fn delete(&self, id: i64) -> AppResult<Vec<PostFile>>;
}
