//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Generic cache trait for key-value operations with TTL support
///
/// Values are opaque strings (usually JSON) so the trait stays dyn-compatible;
/// callers own the encoding.
///
/// A `ttl` of `None` stores the entry without a time-based expiry. TTLs are
/// fixed at write time: reads never extend them.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Short backend identifier used in logs and metrics
    fn backend(&self) -> &'static str;

    /// Gets a raw value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw value, overwriting any previous value and TTL
    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), DomainError>;

    /// Deletes a key, returning the number of entries removed
    async fn delete(&self, key: &str) -> Result<u64, DomainError>;

    /// Checks if a key exists in the cache
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get_raw(key).await?.is_some())
    }

    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::Serialize;

    /// Mock cache for testing
    ///
    /// Records every call so tests can assert that a code path never touched
    /// the cache.
    #[derive(Debug, Default)]
    pub struct MockCache {
        entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
        error: Mutex<Option<String>>,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry<V: Serialize>(self, key: &str, value: &V, ttl: Option<Duration>) -> Self {
            let json = serde_json::to_string(value).unwrap();
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (json, ttl));
            self
        }

        pub fn with_raw_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), None));
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            self.set_error(Some(error.into()));
            self
        }

        /// Toggles the failure mode after construction
        pub fn set_error(&self, error: Option<String>) {
            *self.error.lock().unwrap() = error;
        }

        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn stored(&self, key: &str) -> Option<(String, Option<Duration>)> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        fn backend(&self) -> &'static str {
            "mock"
        }

        async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.check_error()?;
            let entries = self.entries.lock().unwrap();

            Ok(entries.get(key).map(|(json, _)| json.clone()))
        }

        async fn set_raw(
            &self,
            key: &str,
            value: &str,
            ttl: Option<Duration>,
        ) -> Result<(), DomainError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), ttl));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<u64, DomainError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.check_error()?;
            Ok(u64::from(self.entries.lock().unwrap().remove(key).is_some()))
        }

        async fn ping(&self) -> Result<(), DomainError> {
            self.check_error()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_cache_set_get() {
            let cache = MockCache::new();
            cache
                .set_raw("key1", "value1", Some(Duration::from_secs(60)))
                .await
                .unwrap();

            assert_eq!(cache.get_raw("key1").await.unwrap(), Some("value1".to_string()));
            assert_eq!(
                cache.stored("key1").unwrap().1,
                Some(Duration::from_secs(60))
            );
            assert_eq!(cache.write_count(), 1);
            assert_eq!(cache.read_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_cache_delete_counts() {
            let cache = MockCache::new().with_raw_entry("key1", "v");

            assert_eq!(cache.delete("key1").await.unwrap(), 1);
            assert_eq!(cache.delete("key1").await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_mock_cache_with_error() {
            let cache = MockCache::new().with_error("Test error");

            assert!(cache.get_raw("key").await.is_err());
            assert!(cache.ping().await.is_err());

            cache.set_error(None);
            assert!(cache.ping().await.is_ok());
        }

        #[tokio::test]
        async fn test_exists_default_uses_get() {
            let cache = MockCache::new().with_raw_entry("present", "1");

            assert!(cache.exists("present").await.unwrap());
            assert!(!cache.exists("absent").await.unwrap());
        }
    }
}
