//! In-memory cache implementation using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;

use crate::domain::DomainError;
use crate::domain::cache::Cache;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    ttl: Option<Duration>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: &str, ttl: Option<Duration>) -> Self {
        Self {
            data: data.to_string(),
            ttl,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }
}

/// Per-entry expiry: the TTL set at write time, never extended by reads
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Thread-safe in-memory cache implementation using moka
///
/// Entries carry their own TTL; an entry written without one lives until it
/// is overwritten, deleted or evicted by the capacity bound.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { cache }
    }

    /// Reads never remove: moka evicts expired entries itself, and a removal
    /// here could drop a value written concurrently under the same key.
    async fn live_entry(&self, key: &str) -> Option<CacheEntry> {
        self.cache
            .get(key)
            .await
            .filter(|entry| !entry.is_expired())
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    fn backend(&self) -> &'static str {
        "in_memory"
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.live_entry(key).await.map(|entry| entry.data))
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), DomainError> {
        self.cache
            .insert(key.to_string(), CacheEntry::new(value, ttl))
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, DomainError> {
        let removed = self.cache.remove(key).await;
        Ok(u64::from(removed.is_some_and(|entry| !entry.is_expired())))
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("key1", "value1", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(
            cache.get_raw("key1").await.unwrap(),
            Some("value1".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryCache::new();

        assert!(cache.get_raw("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_last_write_wins() {
        let cache = InMemoryCache::new();

        cache.set_raw("key1", "first", None).await.unwrap();
        cache.set_raw("key1", "second", None).await.unwrap();

        assert_eq!(
            cache.get_raw("key1").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_returns_count() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("key1", "value1", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(cache.delete("key1").await.unwrap(), 1);
        assert_eq!(cache.delete("key1").await.unwrap(), 0);
        assert!(cache.get_raw("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let cache = InMemoryCache::new();

        assert_eq!(cache.delete("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_exists() {
        let cache = InMemoryCache::new();

        cache.set_raw("key1", "value1", None).await.unwrap();

        assert!(cache.exists("key1").await.unwrap());
        assert!(!cache.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = InMemoryCache::new();

        // Set with very short TTL
        cache
            .set_raw("key1", "value1", Some(Duration::from_millis(50)))
            .await
            .unwrap();

        // Should exist immediately
        assert!(cache.exists("key1").await.unwrap());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get_raw("key1").await.unwrap().is_none());
        assert!(!cache.exists("key1").await.unwrap());
        assert_eq!(cache.delete("key1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reads_do_not_extend_ttl() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("key1", "value1", Some(Duration::from_millis(120)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(cache.get_raw("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert!(cache.get_raw("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rewrite_resets_ttl() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("key1", "v1", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        cache
            .set_raw("key1", "v2", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get_raw("key1").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_expired_read_keeps_concurrent_write() {
        let cache = Arc::new(InMemoryCache::new());

        for round in 0..50 {
            let key = format!("key{}", round);
            cache
                .set_raw(&key, "stale", Some(Duration::from_millis(1)))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;

            let reader = {
                let cache = cache.clone();
                let key = key.clone();
                tokio::spawn(async move { cache.get_raw(&key).await })
            };
            let writer = {
                let cache = cache.clone();
                let key = key.clone();
                tokio::spawn(async move { cache.set_raw(&key, "fresh", None).await })
            };

            let read = reader.await.unwrap().unwrap();
            writer.await.unwrap().unwrap();

            assert_ne!(read.as_deref(), Some("stale"));
            assert_eq!(cache.get_raw(&key).await.unwrap(), Some("fresh".to_string()));
        }
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(InMemoryCache::new().ping().await.is_ok());
    }
}
