//! Blob store trait for post attachments.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Object storage for image blobs.
///
/// Keys are flat object names (`"{uuid}{ext}"`). Reads never stream bytes
/// through the API; callers hand out short-lived signed URLs instead.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Store `data` under `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Produce a signed URL granting read access to `key` for `expires_in`.
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> AppResult<String>;

    /// Delete the object at `key`. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
