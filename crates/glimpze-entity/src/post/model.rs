//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::{NewPostFile, PostFile};

/// A post with its author name, like count, attachments, and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author.
    pub user_id: i64,
    /// Author handle.
    pub username: String,
    /// Number of likes.
    pub likes: i64,
    /// Attached images.
    pub files: Vec<PostFile>,
    /// Tag names attached to the post.
    pub tags: Vec<String>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Author.
    pub user_id: i64,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Attachments already uploaded to the blob store.
    pub files: Vec<NewPostFile>,
}

/// A post as shown in a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    /// The post.
    pub post: Post,
    /// Number of comments on the post.
    pub comment_count: i64,
    /// Presigned links to the post's images, in attachment order.
    pub image_links: Vec<String>,
}
