//! Vertex AI Vector Search index

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::knowledge::{KnowledgeRecord, Metadata, VectorIndex, VectorMatch};
use crate::infrastructure::embedding::regional_base_url;
use crate::infrastructure::http_client::HttpClientTrait;

/// Distance measure the deployed index was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMeasure {
    #[default]
    DotProduct,
    CosineDistance,
    SquaredL2,
}

impl DistanceMeasure {
    /// Converts a reported distance into a similarity where larger is closer
    pub fn to_similarity(self, distance: f32) -> f32 {
        match self {
            Self::DotProduct => distance,
            Self::CosineDistance => 1.0 - distance,
            Self::SquaredL2 => 1.0 / (1.0 + distance.max(0.0)),
        }
    }
}

/// Resource names and endpoints for one Vector Search index
#[derive(Debug, Clone)]
pub struct VertexVectorIndexConfig {
    pub project_id: String,
    pub location: String,
    /// Index used for upserts and removals
    pub index_id: String,
    /// Endpoint the index is deployed to, used for queries
    pub index_endpoint_id: String,
    pub deployed_index_id: String,
    /// Public endpoint domain; queries go to the regional API when unset
    pub endpoint_host: Option<String>,
    pub access_token: Option<String>,
    pub base_url: Option<String>,
    pub distance_measure: DistanceMeasure,
}

/// Vector index backed by Vertex AI Vector Search
#[derive(Debug)]
pub struct VertexVectorIndex<C: HttpClientTrait> {
    client: C,
    config: VertexVectorIndexConfig,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> VertexVectorIndex<C> {
    pub fn new(client: C, config: VertexVectorIndexConfig) -> Self {
        let auth_header = config
            .access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token));

        Self {
            client,
            config,
            auth_header,
        }
    }

    fn location_path(&self) -> String {
        format!(
            "v1/projects/{}/locations/{}",
            self.config.project_id, self.config.location
        )
    }

    fn index_url(&self) -> String {
        format!(
            "{}/{}/indexes/{}",
            regional_base_url(&self.config.location, self.config.base_url.as_deref()),
            self.location_path(),
            self.config.index_id
        )
    }

    fn find_neighbors_url(&self) -> String {
        let host = match &self.config.endpoint_host {
            Some(host) if host.starts_with("http") => host.trim_end_matches('/').to_string(),
            Some(host) => format!("https://{}", host.trim_end_matches('/')),
            None => regional_base_url(&self.config.location, self.config.base_url.as_deref()),
        };

        format!(
            "{}/{}/indexEndpoints/{}:findNeighbors",
            host,
            self.location_path(),
            self.config.index_endpoint_id
        )
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn parse_neighbors(&self, json: serde_json::Value) -> Result<Vec<VectorMatch>, DomainError> {
        let response: FindNeighborsResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::knowledge_base(format!("Failed to parse findNeighbors response: {}", e))
        })?;

        let neighbors = response
            .nearest_neighbors
            .into_iter()
            .next()
            .map(|query| query.neighbors)
            .unwrap_or_default();

        Ok(neighbors
            .into_iter()
            .map(|neighbor| VectorMatch {
                id: neighbor.datapoint.datapoint_id,
                score: self.config.distance_measure.to_similarity(neighbor.distance),
                metadata: neighbor.datapoint.embedding_metadata.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndex for VertexVectorIndex<C> {
    fn backend(&self) -> &'static str {
        "vertex"
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError> {
        let body = json!({
            "deployedIndexId": self.config.deployed_index_id,
            "queries": [{
                "datapoint": { "datapointId": "query", "featureVector": vector },
                "neighborCount": top_k,
            }],
            "returnFullDatapoint": true,
        });

        let response = self
            .client
            .post_json(&self.find_neighbors_url(), self.headers(), &body)
            .await?;

        let mut matches = self.parse_neighbors(response)?;
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn upsert(&self, records: Vec<KnowledgeRecord>) -> Result<(), DomainError> {
        let datapoints: Vec<serde_json::Value> = records
            .into_iter()
            .map(|record| {
                json!({
                    "datapointId": record.id,
                    "featureVector": record.vector,
                    "embeddingMetadata": record.metadata,
                })
            })
            .collect();

        let url = format!("{}:upsertDatapoints", self.index_url());
        self.client
            .post_json(&url, self.headers(), &json!({ "datapoints": datapoints }))
            .await?;

        Ok(())
    }

    async fn remove(&self, ids: &[String]) -> Result<(), DomainError> {
        let url = format!("{}:removeDatapoints", self.index_url());
        self.client
            .post_json(&url, self.headers(), &json!({ "datapointIds": ids }))
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.client.get_json(&self.index_url(), self.headers()).await?;
        Ok(())
    }
}

// Vector Search REST response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindNeighborsResponse {
    #[serde(default)]
    nearest_neighbors: Vec<QueryNeighbors>,
}

#[derive(Debug, Deserialize)]
struct QueryNeighbors {
    #[serde(default)]
    neighbors: Vec<Neighbor>,
}

#[derive(Debug, Deserialize)]
struct Neighbor {
    datapoint: Datapoint,
    #[serde(default)]
    distance: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Datapoint {
    datapoint_id: String,
    #[serde(default)]
    embedding_metadata: Option<Metadata>,
}
