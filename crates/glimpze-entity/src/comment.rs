//! Comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: i64,
    /// Post commented on.
    pub post_id: i64,
    /// Author.
    pub user_id: i64,
    /// Body text.
    pub content: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated.
    pub updated_at: DateTime<Utc>,
}
