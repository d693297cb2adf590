//! Session registry: token id to owning user, with per-entry expiry.
//!
//! An access or refresh token is only honoured while its entry exists.
//! Deleting the entry revokes the token regardless of its signature.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use glimpze_cache::CacheManager;
use glimpze_core::result::AppResult;
use glimpze_core::traits::CacheProvider;

/// Registry of live sessions over the configured cache provider.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    cache: CacheManager,
}

impl SessionRegistry {
    /// Creates a registry over `cache`.
    pub fn new(cache: CacheManager) -> Self {
        Self { cache }
    }

    /// Records `user_id` under `key` until `expires_at`.
    ///
    /// An entry that would already be expired is not written.
    pub async fn set(&self, key: &str, user_id: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let remaining = (expires_at - Utc::now()).num_milliseconds();
        if remaining <= 0 {
            debug!(key = %key, "Skipping session entry that is already expired");
            return Ok(());
        }
        self.cache
            .set(key, user_id, Duration::from_millis(remaining as u64))
            .await
    }

    /// The user id recorded under `key`, or `None` when absent or expired.
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.cache.get(key).await
    }

    /// Removes `key`. Removing a missing entry succeeds.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use glimpze_cache::memory::MemoryCacheProvider;
    use glimpze_core::config::MemoryCacheConfig;

    fn registry() -> SessionRegistry {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig::default());
        SessionRegistry::new(CacheManager::from_provider(Arc::new(provider)))
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let registry = registry();
        let expires = Utc::now() + chrono::Duration::minutes(5);

        registry.set("access:a", "7", expires).await.unwrap();
        assert_eq!(registry.get("access:a").await.unwrap().as_deref(), Some("7"));

        registry.delete("access:a").await.unwrap();
        assert_eq!(registry.get("access:a").await.unwrap(), None);
        registry.delete("access:a").await.unwrap();
    }

    #[tokio::test]
    async fn test_past_expiry_is_noop() {
        let registry = registry();
        let expired = Utc::now() - chrono::Duration::seconds(1);

        registry.set("refresh:b", "7", expired).await.unwrap();
        assert_eq!(registry.get("refresh:b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entries_expire_independently() {
        let registry = registry();
        let short = Utc::now() + chrono::Duration::milliseconds(100);
        let long = Utc::now() + chrono::Duration::minutes(5);

        registry.set("access:short", "1", short).await.unwrap();
        registry.set("access:long", "2", long).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        assert_eq!(registry.get("access:short").await.unwrap(), None);
        assert_eq!(registry.get("access:long").await.unwrap().as_deref(), Some("2"));
    }
}
