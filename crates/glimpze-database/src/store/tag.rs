//! The tag vocabulary and post tagging.

use async_trait::async_trait;

use glimpze_core::result::AppResult;
use glimpze_entity::tag::{PostTag, Tag};

#[async_trait]
pub trait TagStore: Send + Sync + std::fmt::Debug {
    /// Add a tag to the vocabulary. Duplicate names are a `Conflict`.
    async fn create(&self, name: &str) -> AppResult<Tag>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tag>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>>;

    /// Remove a tag and detach it from every post.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Attach a tag to a post. Attaching twice is a `Conflict`.
    async fn attach(&self, post_id: i64, tag: &Tag) -> AppResult<PostTag>;

    /// Detach a tag from a post. Fails with `NotFound` when not attached.
    async fn detach(&self, post_id: i64, tag_id: i64) -> AppResult<()>;

    /// Tags attached to a post, by name.
    async fn list_for_post(&self, post_id: i64) -> AppResult<Vec<PostTag>>;
}
