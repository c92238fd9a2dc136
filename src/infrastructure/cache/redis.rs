//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::domain::DomainError;
use crate::domain::cache::{Cache, prefixed_key};
use crate::infrastructure::retry::{RetryPolicy, retry_with_backoff};

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix prepended to every key
    pub key_prefix: Option<String>,
    /// Backoff for the initial connection and for reconnects
    pub retry: RetryPolicy,
    /// Timeout for establishing a connection
    pub connection_timeout: Duration,
    /// Upper bound on a single command round trip
    pub response_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            retry: RetryPolicy::default(),
            connection_timeout: Duration::from_secs(2),
            response_timeout: Duration::from_secs(2),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Connection manager settings
    ///
    /// The manager makes a single attempt per connect; `retry` owns the
    /// backoff. After a dropped connection the next command triggers a
    /// reconnect.
    fn manager_config(&self) -> ConnectionManagerConfig {
        ConnectionManagerConfig::new()
            .set_number_of_retries(0)
            .set_connection_timeout(self.connection_timeout)
            .set_response_timeout(self.response_timeout)
    }
}

/// Redis cache implementation
///
/// The `ConnectionManager` is cheap to clone and reconnects transparently,
/// so each operation works on its own clone.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to Redis, retrying with backoff before giving up
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = retry_with_backoff(&config.retry, "redis_connect", || {
            ConnectionManager::new_with_config(client.clone(), config.manager_config())
        })
        .await
        .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        info!(
            attempts = config.retry.max_attempts,
            "Connected to Redis hot-state backend"
        );

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => prefixed_key(prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: redis::RedisResult<()> = match ttl {
            Some(ttl) => {
                let ttl_millis = (ttl.as_millis() as u64).max(1);
                conn.pset_ex(&prefixed_key, value, ttl_millis).await
            }
            None => conn.set(&prefixed_key, value).await,
        };

        result.map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))
    }

    async fn delete(&self, key: &str) -> Result<u64, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: u64 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let exists: bool = conn.exists(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to check existence of key '{}': {}", key, e))
        })?;

        Ok(exists)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    // Note: These tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("test:")
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache
            .set_raw("key1", "value1", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(
            cache.get_raw("key1").await.unwrap(),
            Some("value1".to_string())
        );

        // Cleanup
        cache.delete("key1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete_counts() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache.set_raw("key1", "value1", None).await.unwrap();

        assert_eq!(cache.delete("key1").await.unwrap(), 1);
        assert_eq!(cache.delete("key1").await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_entry_expires() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache
            .set_raw("ttl_key", "value1", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(cache.exists("ttl_key").await.unwrap());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get_raw("ttl_key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_connect_failure_after_retries() {
        // Nothing listens on port 1
        let config = RedisCacheConfig::new("redis://127.0.0.1:1")
            .with_retry(RetryPolicy::default().with_max_attempts(2).with_jitter(false))
            .with_connection_timeout(Duration::from_millis(200));

        let result = RedisCache::new(config).await;
        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }

    #[tokio::test]
    async fn test_default_policy_gives_up_quickly() {
        let started = Instant::now();

        let result = RedisCache::new(RedisCacheConfig::new("redis://127.0.0.1:1")).await;

        assert!(result.is_err());
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "connect took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_manager_makes_single_attempt() {
        let config = RedisCacheConfig::new("redis://127.0.0.1:1")
            .with_retry(RetryPolicy::default().with_max_attempts(7));

        let rendered = format!("{:?}", config.manager_config());
        assert!(rendered.contains("number_of_retries: 0"), "{}", rendered);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let result = rt.block_on(RedisCache::new(RedisCacheConfig::new("not a url")));
        assert!(result.is_err());
    }

    #[test]
    fn test_key_prefix() {
        let config = RedisCacheConfig::new("redis://localhost").with_key_prefix("myapp:");

        assert_eq!(config.key_prefix, Some("myapp:".to_string()));
    }
}
