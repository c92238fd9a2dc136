use serde::Deserialize;

use crate::infrastructure::cache::CacheType;
use crate::infrastructure::embedding::EmbeddingBackend;
use crate::infrastructure::knowledge::{DistanceMeasure, IndexBackend};
use crate::infrastructure::services::ColdLookupPolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub hot_state: HotStateSettings,
    pub cold_state: ColdStateSettings,
    pub orchestrator: OrchestratorSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Name reported by `/health`
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Hot-state (session cache) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HotStateSettings {
    /// Explicit backend; when unset, Redis is used if `redis_url` is present
    pub backend: Option<CacheType>,
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub session_ttl_secs: u64,
    /// Capacity bound of the in-memory backend
    pub max_capacity: u64,
    pub retry: RetrySettings,
    pub connection_timeout_ms: u64,
    pub response_timeout_ms: u64,
    /// Serve from memory when Redis cannot be reached at startup
    pub fallback_to_memory: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

/// Cold-state (knowledge store) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColdStateSettings {
    pub index_backend: IndexBackend,
    pub embedding_backend: EmbeddingBackend,
    pub project_id: Option<String>,
    pub location: String,
    pub index_id: Option<String>,
    pub index_endpoint_id: Option<String>,
    pub deployed_index_id: Option<String>,
    /// Host serving the deployed index (public endpoints use a dedicated domain)
    pub index_endpoint_host: Option<String>,
    pub embedding_model: String,
    pub dimensions: usize,
    pub access_token: Option<String>,
    /// Overrides `https://<location>-aiplatform.googleapis.com`
    pub api_base_url: Option<String>,
    pub distance_measure: DistanceMeasure,
    pub request_timeout_ms: u64,
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    pub cold_lookup: ColdLookupPolicy,
    pub knowledge_limit: usize,
    pub keep_alive_secs: u64,
    /// Text returned when generation fails
    pub fallback_response: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            service_name: "adk-orchestrator".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for HotStateSettings {
    fn default() -> Self {
        Self {
            backend: None,
            redis_url: None,
            key_prefix: String::new(),
            session_ttl_secs: 3600,
            max_capacity: 10_000,
            retry: RetrySettings::default(),
            connection_timeout_ms: 2000,
            response_timeout_ms: 2000,
            fallback_to_memory: true,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 50,
            max_delay_ms: 2000,
            jitter: true,
        }
    }
}

impl Default for ColdStateSettings {
    fn default() -> Self {
        Self {
            index_backend: IndexBackend::default(),
            embedding_backend: EmbeddingBackend::default(),
            project_id: None,
            location: "us-central1".to_string(),
            index_id: None,
            index_endpoint_id: None,
            deployed_index_id: None,
            index_endpoint_host: None,
            embedding_model: "textembedding-gecko@003".to_string(),
            dimensions: 768,
            access_token: None,
            api_base_url: None,
            distance_measure: DistanceMeasure::default(),
            request_timeout_ms: 10_000,
            default_limit: 5,
            max_limit: 50,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            cold_lookup: ColdLookupPolicy::default(),
            knowledge_limit: 5,
            keep_alive_secs: 30,
            fallback_response: "I'm having trouble responding right now. Please try again shortly."
                .to_string(),
        }
    }
}

impl HotStateSettings {
    /// Resolves the backend, preferring Redis whenever a URL is configured
    pub fn resolved_backend(&self) -> CacheType {
        match self.backend {
            Some(backend) => backend,
            None if self.redis_url.is_some() => CacheType::Redis,
            None => CacheType::InMemory,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_overrides(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// Applies the conventional deployment variables on top of layered config
    ///
    /// `PORT`, `REDIS_URL`, `GOOGLE_CLOUD_PROJECT` and `VERTEX_LOCATION` win
    /// over file and `APP__` values. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(port) = lookup("PORT").and_then(|value| value.parse().ok()) {
            self.server.port = port;
        }

        if let Some(url) = lookup("REDIS_URL") {
            self.hot_state.redis_url = Some(url);
        }

        if let Some(project) = lookup("GOOGLE_CLOUD_PROJECT") {
            self.cold_state.project_id = Some(project);
        }

        if let Some(location) = lookup("VERTEX_LOCATION") {
            self.cold_state.location = location;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.hot_state.session_ttl_secs, 3600);
        assert_eq!(config.hot_state.retry.max_attempts, 5);
        assert_eq!(config.cold_state.location, "us-central1");
        assert_eq!(config.cold_state.dimensions, 768);
        assert_eq!(config.orchestrator.keep_alive_secs, 30);
        assert_eq!(config.orchestrator.cold_lookup, ColdLookupPolicy::Always);
        assert_eq!(config.hot_state.resolved_backend(), CacheType::InMemory);
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();

        config.apply_overrides(lookup_from(&[
            ("PORT", "3001"),
            ("REDIS_URL", "redis://cache:6379"),
            ("GOOGLE_CLOUD_PROJECT", "my-project"),
            ("VERTEX_LOCATION", "europe-west4"),
        ]));

        assert_eq!(config.server.port, 3001);
        assert_eq!(
            config.hot_state.redis_url.as_deref(),
            Some("redis://cache:6379")
        );
        assert_eq!(config.cold_state.project_id.as_deref(), Some("my-project"));
        assert_eq!(config.cold_state.location, "europe-west4");
        assert_eq!(config.hot_state.resolved_backend(), CacheType::Redis);
    }

    #[test]
    fn test_invalid_or_empty_overrides_are_ignored() {
        let mut config = AppConfig::default();

        config.apply_overrides(lookup_from(&[("PORT", "not-a-port"), ("REDIS_URL", " ")]));

        assert_eq!(config.server.port, 8080);
        assert!(config.hot_state.redis_url.is_none());
    }

    #[test]
    fn test_explicit_backend_wins() {
        let settings = HotStateSettings {
            backend: Some(CacheType::InMemory),
            redis_url: Some("redis://localhost".to_string()),
            ..Default::default()
        };

        assert_eq!(settings.resolved_backend(), CacheType::InMemory);
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 9000 },
            "hot_state": { "backend": "redis", "session_ttl_secs": 60 },
            "orchestrator": { "cold_lookup": "on_hot_miss" }
        }))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.hot_state.backend, Some(CacheType::Redis));
        assert_eq!(config.hot_state.session_ttl_secs, 60);
        assert_eq!(config.orchestrator.cold_lookup, ColdLookupPolicy::OnHotMiss);
    }
}
