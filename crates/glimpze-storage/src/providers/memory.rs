//! In-memory blob store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use glimpze_core::result::AppResult;
use glimpze_core::traits::BlobStore;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: String,
}

/// Blob store holding objects in a concurrent map. Signed URLs use a
/// `memory://` scheme and are not fetchable.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<DashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The object stored under `key`.
    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        self.objects.insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        Ok(format!("memory://{key}?expires_in={}", expires_in.as_secs()))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_presign_delete() {
        let store = MemoryBlobStore::new();
        store
            .put("a.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert_eq!(store.get("a.png").unwrap().content_type, "image/png");

        let url = store
            .presigned_url("a.png", Duration::from_secs(900))
            .await
            .unwrap();
        assert_eq!(url, "memory://a.png?expires_in=900");

        store.delete("a.png").await.unwrap();
        store.delete("a.png").await.unwrap();
        assert!(store.is_empty());
    }
}
