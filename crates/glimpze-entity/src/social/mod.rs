//! Likes and follows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's like on a post. At most one per (user, post).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PostLike {
    /// User who liked.
    pub user_id: i64,
    /// Liked post.
    pub post_id: i64,
    /// When the like was recorded.
    pub created_at: DateTime<Utc>,
}

/// `follower_id` follows `user_id`. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Follower {
    /// Followed user.
    pub user_id: i64,
    /// Following user.
    pub follower_id: i64,
    /// When the follow was recorded.
    pub created_at: DateTime<Utc>,
}
