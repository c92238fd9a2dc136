//! Embedding provider selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{HashingEmbeddingProvider, VertexEmbeddingConfig, VertexEmbeddingProvider};
use crate::config::ColdStateSettings;
use crate::domain::DomainError;
use crate::domain::embedding::EmbeddingProvider;
use crate::infrastructure::http_client::HttpClient;

/// Supported embedding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Local feature hashing
    #[default]
    Hashing,
    /// Vertex AI text embedding model
    Vertex,
}

/// Creates the embedding provider described by the cold-state settings
pub fn create_embedding_provider(
    settings: &ColdStateSettings,
) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    match settings.embedding_backend {
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbeddingProvider::new(
            settings.dimensions,
        ))),
        EmbeddingBackend::Vertex => {
            let project_id = settings.project_id.clone().ok_or_else(|| {
                DomainError::configuration(
                    "GOOGLE_CLOUD_PROJECT is required for the Vertex embedding backend",
                )
            })?;

            let mut config = VertexEmbeddingConfig::new(project_id, settings.location.clone())
                .with_model(settings.embedding_model.clone(), settings.dimensions);

            if let Some(token) = &settings.access_token {
                config = config.with_access_token(token.clone());
            }

            if let Some(base_url) = &settings.api_base_url {
                config = config.with_base_url(base_url.clone());
            }

            let client = HttpClient::with_timeout(Duration::from_millis(settings.request_timeout_ms))?;
            Ok(Arc::new(VertexEmbeddingProvider::new(client, config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_is_default() {
        let provider = create_embedding_provider(&ColdStateSettings::default()).unwrap();

        assert_eq!(provider.provider_name(), "hashing");
        assert_eq!(provider.dimensions(), 768);
    }

    #[test]
    fn test_vertex_requires_project() {
        let settings = ColdStateSettings {
            embedding_backend: EmbeddingBackend::Vertex,
            ..Default::default()
        };

        assert!(matches!(
            create_embedding_provider(&settings),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_vertex_with_project() {
        let settings = ColdStateSettings {
            embedding_backend: EmbeddingBackend::Vertex,
            project_id: Some("demo".to_string()),
            ..Default::default()
        };

        let provider = create_embedding_provider(&settings).unwrap();
        assert_eq!(provider.provider_name(), "vertex");
        assert_eq!(provider.model(), "textembedding-gecko@003");
    }
}
