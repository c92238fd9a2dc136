//! Cache factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::config::HotStateSettings;
use crate::domain::DomainError;
use crate::domain::cache::Cache;
use crate::infrastructure::retry::RetryPolicy;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum CacheType {
    /// In-memory cache using moka
    #[default]
    InMemory,
    /// Redis cache
    Redis,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::InMemory => write!(f, "in_memory"),
            CacheType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheType::InMemory),
            "redis" => Ok(CacheType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache type: {}. Valid types: in_memory, redis",
                s
            ))),
        }
    }
}

impl TryFrom<String> for CacheType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Configuration for cache factory
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Type of cache to create
    pub cache_type: CacheType,
    /// Redis URL (required for Redis type)
    pub redis_url: Option<String>,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Maximum capacity (for in-memory cache)
    pub max_capacity: u64,
    pub retry: RetryPolicy,
    pub connection_timeout: Duration,
    pub response_timeout: Duration,
    /// Use the in-memory backend if Redis cannot be reached
    pub fallback_to_memory: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
            retry: RetryPolicy::default(),
            connection_timeout: Duration::from_secs(2),
            response_timeout: Duration::from_secs(2),
            fallback_to_memory: true,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration for in-memory cache
    pub fn in_memory() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            ..Default::default()
        }
    }

    /// Creates a new configuration for Redis cache
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            cache_type: CacheType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Builds the factory configuration from the hot-state settings
    pub fn from_settings(settings: &HotStateSettings) -> Self {
        Self {
            cache_type: settings.resolved_backend(),
            redis_url: settings.redis_url.clone(),
            key_prefix: (!settings.key_prefix.is_empty()).then(|| settings.key_prefix.clone()),
            max_capacity: settings.max_capacity,
            retry: RetryPolicy::from(&settings.retry),
            connection_timeout: Duration::from_millis(settings.connection_timeout_ms),
            response_timeout: Duration::from_millis(settings.response_timeout_ms),
            fallback_to_memory: settings.fallback_to_memory,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fallback_to_memory(mut self, fallback: bool) -> Self {
        self.fallback_to_memory = fallback;
        self
    }
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a new cache factory
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance based on configuration
    ///
    /// When Redis stays unreachable after its retries and
    /// `fallback_to_memory` is set, an in-memory cache is returned instead.
    pub async fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        match config.cache_type {
            CacheType::InMemory => Ok(self.create_in_memory(config)),
            CacheType::Redis => match self.create_redis(config).await {
                Ok(cache) => Ok(cache),
                Err(e) if config.fallback_to_memory => {
                    error!(
                        error = %e,
                        "Redis unavailable, falling back to in-memory hot-state cache"
                    );
                    Ok(self.create_in_memory(config))
                }
                Err(e) => Err(e),
            },
        }
    }

    fn create_in_memory(&self, config: &CacheConfig) -> Arc<dyn Cache> {
        info!(max_capacity = config.max_capacity, "Using in-memory hot-state cache");
        let in_memory_config = InMemoryCacheConfig::default().with_max_capacity(config.max_capacity);
        Arc::new(InMemoryCache::with_config(in_memory_config))
    }

    async fn create_redis(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        let url = config.redis_url.clone().ok_or_else(|| {
            DomainError::configuration("Redis URL is required for Redis cache type")
        })?;

        let mut redis_config = RedisCacheConfig::new(url)
            .with_retry(config.retry.clone())
            .with_connection_timeout(config.connection_timeout)
            .with_response_timeout(config.response_timeout);

        if let Some(prefix) = &config.key_prefix {
            redis_config = redis_config.with_key_prefix(prefix.clone());
        }

        let cache = RedisCache::new(redis_config).await?;
        Ok(Arc::new(cache))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_type_from_str() {
        assert_eq!("in_memory".parse::<CacheType>().unwrap(), CacheType::InMemory);
        assert_eq!("inmemory".parse::<CacheType>().unwrap(), CacheType::InMemory);
        assert_eq!("memory".parse::<CacheType>().unwrap(), CacheType::InMemory);
        assert_eq!("redis".parse::<CacheType>().unwrap(), CacheType::Redis);
        assert_eq!("REDIS".parse::<CacheType>().unwrap(), CacheType::Redis);
    }

    #[test]
    fn test_cache_type_from_str_invalid() {
        assert!("invalid".parse::<CacheType>().is_err());
    }

    #[test]
    fn test_cache_type_display() {
        assert_eq!(CacheType::InMemory.to_string(), "in_memory");
        assert_eq!(CacheType::Redis.to_string(), "redis");
    }

    #[test]
    fn test_from_settings() {
        let settings = HotStateSettings {
            redis_url: Some("redis://cache:6379".to_string()),
            key_prefix: "orch:".to_string(),
            ..Default::default()
        };

        let config = CacheConfig::from_settings(&settings);

        assert_eq!(config.cache_type, CacheType::Redis);
        assert_eq!(config.key_prefix.as_deref(), Some("orch:"));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.response_timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_factory_create_in_memory() {
        let factory = CacheFactory::new();

        let cache = factory.create(&CacheConfig::in_memory()).await.unwrap();

        cache
            .set_raw("test", "value", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(cache.get_raw("test").await.unwrap(), Some("value".to_string()));
        assert_eq!(cache.backend(), "in_memory");
    }

    #[tokio::test]
    async fn test_factory_create_redis_missing_url() {
        let factory = CacheFactory::new();
        let config = CacheConfig {
            cache_type: CacheType::Redis,
            redis_url: None,
            fallback_to_memory: false,
            ..Default::default()
        };

        assert!(factory.create(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_factory_falls_back_when_redis_unreachable() {
        let factory = CacheFactory::new();
        let config = CacheConfig::redis("redis://127.0.0.1:1")
            .with_retry(RetryPolicy::disabled());

        let cache = factory.create(&config).await.unwrap();

        assert_eq!(cache.backend(), "in_memory");
    }

    #[tokio::test]
    async fn test_factory_fails_without_fallback() {
        let factory = CacheFactory::new();
        let config = CacheConfig::redis("redis://127.0.0.1:1")
            .with_retry(RetryPolicy::disabled())
            .with_fallback_to_memory(false);

        let result = factory.create(&config).await;

        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }
}
