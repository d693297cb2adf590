//! Blob store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use glimpze_core::config::StorageConfig;
use glimpze_core::error::AppError;
use glimpze_core::result::AppResult;
use glimpze_core::traits::BlobStore;

/// Wraps the configured blob store and the signed-URL lifetime.
#[derive(Debug, Clone)]
pub struct StorageManager {
    inner: Arc<dyn BlobStore>,
    presign_ttl: Duration,
}

impl StorageManager {
    /// Create the blob store selected by `config.provider`.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn BlobStore> = match config.provider.as_str() {
            #[cfg(feature = "s3")]
            "s3" => Arc::new(crate::providers::S3BlobStore::new(&config.s3).await?),
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory blob store");
                Arc::new(crate::providers::MemoryBlobStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: s3, memory"
                )));
            }
        };

        Ok(Self::from_store(
            inner,
            Duration::from_secs(config.presign_ttl_seconds),
        ))
    }

    /// Wrap an existing store (for testing).
    pub fn from_store(store: Arc<dyn BlobStore>, presign_ttl: Duration) -> Self {
        Self {
            inner: store,
            presign_ttl,
        }
    }

    /// Provider name of the wrapped store.
    pub fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    /// Store an object.
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        self.inner.put(key, data, content_type).await
    }

    /// A signed read URL valid for the configured lifetime.
    pub async fn presign(&self, key: &str) -> AppResult<String> {
        self.inner.presigned_url(key, self.presign_ttl).await
    }

    /// Delete an object.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    /// Delete every listed object, logging rather than failing on errors.
    /// Used to clean up blobs whose database rows are gone or never landed.
    pub async fn delete_quietly(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.inner.delete(key).await {
                warn!(key = %key, error = %e, "Failed to delete orphaned blob");
            }
        }
    }

    /// Check that the store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
