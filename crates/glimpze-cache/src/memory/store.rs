//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use tracing::warn;

use glimpze_core::config::MemoryCacheConfig;
use glimpze_core::result::AppResult;
use glimpze_core::traits::CacheProvider;

/// A cached value together with the lifetime it was written with.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Per-entry expiry policy: every write restarts the clock with its own TTL.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache provider using moka.
///
/// Without a configured capacity, entries leave only through expiry or
/// deletion. With one, moka evicts by frequency once it is full, and that
/// includes session entries whose TTL has not run out.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let mut builder = Cache::builder().expire_after(EntryExpiry);
        if let Some(capacity) = config.max_capacity {
            warn!(
                max_capacity = capacity,
                "In-memory cache is capped; sessions past the cap are evicted early"
            );
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    async fn live_entry(&self, key: &str) -> Option<Entry> {
        // moka evicts lazily; the deadline check keeps reads exact.
        self.cache.get(key).await.filter(Entry::is_live)
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl,
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
