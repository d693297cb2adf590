//! Tag vocabulary and post tagging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag from the moderator-managed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Unique tag identifier.
    pub id: i64,
    /// Unique tag name.
    pub name: String,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}

/// A tag attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PostTag {
    /// Tagged post.
    pub post_id: i64,
    /// Attached tag.
    pub tag_id: i64,
    /// Tag name at attachment time.
    pub tag_name: String,
}
