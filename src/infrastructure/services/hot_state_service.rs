//! Hot-state client - fail-soft access to the session cache

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::cache::{Cache, session_key};
use crate::domain::{DomainError, FailSoft, Session};
use crate::infrastructure::observability::record_hot_state_op;

/// Configuration for the hot-state client
#[derive(Debug, Clone)]
pub struct HotStateConfig {
    /// TTL applied to session entries
    pub session_ttl: Duration,
}

impl Default for HotStateConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(3600),
        }
    }
}

impl HotStateConfig {
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

/// Fail-soft wrapper around a [`Cache`] backend
///
/// No operation returns an error or panics: backend failures are logged,
/// counted and reported as [`FailSoft::Failed`].
#[derive(Debug, Clone)]
pub struct HotStateClient {
    cache: Arc<dyn Cache>,
    config: HotStateConfig,
}

impl HotStateClient {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_config(cache, HotStateConfig::default())
    }

    pub fn with_config(cache: Arc<dyn Cache>, config: HotStateConfig) -> Self {
        Self { cache, config }
    }

    pub fn backend(&self) -> &'static str {
        self.cache.backend()
    }

    pub fn session_ttl(&self) -> Duration {
        self.config.session_ttl
    }

    fn failed<T>(&self, operation: &'static str, key: &str, error: DomainError) -> FailSoft<T> {
        warn!(
            backend = self.backend(),
            operation,
            key,
            error = %error,
            "Hot-state operation failed"
        );
        record_hot_state_op(self.backend(), operation, "error");
        FailSoft::Failed(error.to_string())
    }

    /// Reads a value; `Absent` on miss or expiry
    pub async fn get(&self, key: &str) -> FailSoft<String> {
        match self.cache.get_raw(key).await {
            Ok(Some(value)) => {
                record_hot_state_op(self.backend(), "get", "hit");
                FailSoft::Value(value)
            }
            Ok(None) => {
                debug!(key, "Hot-state miss");
                record_hot_state_op(self.backend(), "get", "miss");
                FailSoft::Absent
            }
            Err(e) => self.failed("get", key, e),
        }
    }

    /// Writes a value unconditionally; `ttl` of `None` means no expiry
    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> FailSoft<()> {
        match self.cache.set_raw(key, value, ttl).await {
            Ok(()) => {
                record_hot_state_op(self.backend(), "set", "ok");
                FailSoft::Value(())
            }
            Err(e) => self.failed("set", key, e),
        }
    }

    /// Removes a key, yielding the number of entries removed
    pub async fn delete(&self, key: &str) -> FailSoft<u64> {
        match self.cache.delete(key).await {
            Ok(count) => {
                record_hot_state_op(self.backend(), "delete", "ok");
                FailSoft::Value(count)
            }
            Err(e) => self.failed("delete", key, e),
        }
    }

    pub async fn exists(&self, key: &str) -> FailSoft<bool> {
        match self.cache.exists(key).await {
            Ok(exists) => {
                record_hot_state_op(self.backend(), "exists", "ok");
                FailSoft::Value(exists)
            }
            Err(e) => self.failed("exists", key, e),
        }
    }

    /// Loads the last turn of a session
    ///
    /// A payload that does not decode as a session is logged and reported
    /// as `Absent` so the turn proceeds as a first turn.
    pub async fn get_session(&self, session_id: &str) -> FailSoft<Session> {
        let key = session_key(session_id);

        match self.get(&key).await {
            FailSoft::Value(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(mut session) => {
                    if session.session_id.is_empty() {
                        session.session_id = session_id.to_string();
                    }
                    FailSoft::Value(session)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding corrupt session payload");
                    FailSoft::Absent
                }
            },
            FailSoft::Absent => FailSoft::Absent,
            FailSoft::Failed(reason) => FailSoft::Failed(reason),
        }
    }

    /// Stores a session's last turn with the configured session TTL
    pub async fn put_session(&self, session: &Session) -> FailSoft<()> {
        let key = session_key(&session.session_id);

        match serde_json::to_string(session) {
            Ok(payload) => self.set(&key, &payload, Some(self.config.session_ttl)).await,
            Err(e) => self.failed("set", &key, DomainError::cache(e.to_string())),
        }
    }

    /// Whether the backend currently answers
    pub async fn is_healthy(&self) -> bool {
        match self.cache.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = self.backend(), error = %e, "Hot-state backend unhealthy");
                false
            }
        }
    }
}
