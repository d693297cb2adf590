//! Post attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An image attached to a post. The blob lives under [`PostFile::blob_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PostFile {
    /// Blob identifier.
    pub file_id: Uuid,
    /// Owning post.
    pub post_id: i64,
    /// Extension including the leading dot (e.g. `".png"`).
    pub file_extension: String,
    /// Name the file was uploaded with.
    pub original_filename: String,
    /// When the attachment was recorded.
    pub created_at: DateTime<Utc>,
}

impl PostFile {
    /// Object key in the blob store.
    pub fn blob_key(&self) -> String {
        blob_key(&self.file_id, &self.file_extension)
    }
}

/// An attachment that has been uploaded but not yet recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostFile {
    /// Blob identifier.
    pub file_id: Uuid,
    /// Extension including the leading dot.
    pub file_extension: String,
    /// Name the file was uploaded with.
    pub original_filename: String,
}

impl NewPostFile {
    /// Object key in the blob store.
    pub fn blob_key(&self) -> String {
        blob_key(&self.file_id, &self.file_extension)
    }
}

fn blob_key(file_id: &Uuid, extension: &str) -> String {
    format!("{file_id}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_key_format() {
        let id = Uuid::nil();
        let file = NewPostFile {
            file_id: id,
            file_extension: ".png".to_string(),
            original_filename: "cat.png".to_string(),
        };
        assert_eq!(file.blob_key(), "00000000-0000-0000-0000-000000000000.png");
    }
}
