//! Likes and follows, each gated by its own daily quota.

use std::sync::Arc;

use tracing::info;

use glimpze_core::result::AppResult;
use glimpze_database::store::{FollowStore, LikeStore};
use glimpze_entity::social::{Follower, PostLike};
use glimpze_entity::user::User;

/// Handles likes and follows.
#[derive(Debug, Clone)]
pub struct SocialService {
    likes: Arc<dyn LikeStore>,
    follows: Arc<dyn FollowStore>,
}

impl SocialService {
    /// Creates a new social service.
    pub fn new(likes: Arc<dyn LikeStore>, follows: Arc<dyn FollowStore>) -> Self {
        Self { likes, follows }
    }

    /// Likes a post, spending one `Like` unit. Liking twice is a conflict
    /// and costs nothing.
    pub async fn like(&self, user: &User, post_id: i64) -> AppResult<PostLike> {
        let like = self.likes.like(user.id, post_id).await?;
        info!(user_id = user.id, post_id, "Post liked");
        Ok(like)
    }

    /// Removes a like.
    pub async fn unlike(&self, user: &User, post_id: i64) -> AppResult<()> {
        self.likes.unlike(user.id, post_id).await
    }

    /// Makes `user` follow `target_id`, spending one `Follow` unit.
    pub async fn follow(&self, user: &User, target_id: i64) -> AppResult<Follower> {
        let follower = self.follows.follow(target_id, user.id).await?;
        info!(user_id = target_id, follower_id = user.id, "User followed");
        Ok(follower)
    }

    /// Stops `user` following `target_id`.
    pub async fn unfollow(&self, user: &User, target_id: i64) -> AppResult<()> {
        self.follows.unfollow(target_id, user.id).await
    }
}
