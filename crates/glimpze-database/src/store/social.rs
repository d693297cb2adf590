//! Likes and follows.

use async_trait::async_trait;

use glimpze_core::result::AppResult;
use glimpze_entity::social::{Follower, PostLike};

#[async_trait]
pub trait LikeStore: Send + Sync + std::fmt::Debug {
    /// Consume one `Like` unit and record the like in one transaction.
    /// A repeated like is a `Conflict`; an unknown post is `NotFound`.
    async fn like(&self, user_id: i64, post_id: i64) -> AppResult<PostLike>;

    /// Remove a like. Fails with `NotFound` when there was none.
    async fn unlike(&self, user_id: i64, post_id: i64) -> AppResult<()>;
}

#[async_trait]
pub trait FollowStore: Send + Sync + std::fmt::Debug {
    /// Consume one `Follow` unit of `follower_id` and record that it follows
    /// `user_id`, in one transaction.
    async fn follow(&self, user_id: i64, follower_id: i64) -> AppResult<Follower>;

    /// Remove a follow. Fails with `NotFound` when there was none.
    async fn unfollow(&self, user_id: i64, follower_id: i64) -> AppResult<()>;
}
