//! Vector index selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{InMemoryVectorIndex, VertexVectorIndex, VertexVectorIndexConfig};
use crate::config::ColdStateSettings;
use crate::domain::DomainError;
use crate::domain::knowledge::VectorIndex;
use crate::infrastructure::http_client::HttpClient;

/// Supported vector index backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    #[default]
    InMemory,
    Vertex,
}

fn required(value: &Option<String>, name: &str) -> Result<String, DomainError> {
    value.clone().ok_or_else(|| {
        DomainError::configuration(format!("{} is required for the Vertex index backend", name))
    })
}

/// Creates the vector index described by the cold-state settings
pub fn create_vector_index(
    settings: &ColdStateSettings,
) -> Result<Arc<dyn VectorIndex>, DomainError> {
    match settings.index_backend {
        IndexBackend::InMemory => Ok(Arc::new(InMemoryVectorIndex::new(settings.dimensions))),
        IndexBackend::Vertex => {
            let config = VertexVectorIndexConfig {
                project_id: required(&settings.project_id, "GOOGLE_CLOUD_PROJECT")?,
                location: settings.location.clone(),
                index_id: required(&settings.index_id, "cold_state.index_id")?,
                index_endpoint_id: required(
                    &settings.index_endpoint_id,
                    "cold_state.index_endpoint_id",
                )?,
                deployed_index_id: required(
                    &settings.deployed_index_id,
                    "cold_state.deployed_index_id",
                )?,
                endpoint_host: settings.index_endpoint_host.clone(),
                access_token: settings.access_token.clone(),
                base_url: settings.api_base_url.clone(),
                distance_measure: settings.distance_measure,
            };

            let client = HttpClient::with_timeout(Duration::from_millis(settings.request_timeout_ms))?;
            Ok(Arc::new(VertexVectorIndex::new(client, config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_is_default() {
        let index = create_vector_index(&ColdStateSettings::default()).unwrap();

        assert_eq!(index.backend(), "in_memory");
    }

    #[test]
    fn test_vertex_requires_resource_ids() {
        let settings = ColdStateSettings {
            index_backend: IndexBackend::Vertex,
            project_id: Some("demo".to_string()),
            ..Default::default()
        };

        let err = create_vector_index(&settings).unwrap_err();
        assert!(err.to_string().contains("index_id"));
    }

    #[test]
    fn test_vertex_fully_configured() {
        let settings = ColdStateSettings {
            index_backend: IndexBackend::Vertex,
            project_id: Some("demo".to_string()),
            index_id: Some("idx".to_string()),
            index_endpoint_id: Some("ep".to_string()),
            deployed_index_id: Some("deployed".to_string()),
            ..Default::default()
        };

        assert_eq!(create_vector_index(&settings).unwrap().backend(), "vertex");
    }
}
