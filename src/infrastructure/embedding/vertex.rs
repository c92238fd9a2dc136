//! Vertex AI text embedding provider

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::embedding::EmbeddingProvider;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_MODEL: &str = "textembedding-gecko@003";
const DEFAULT_DIMENSIONS: usize = 768;

/// Connection settings for the Vertex AI prediction endpoint
#[derive(Debug, Clone)]
pub struct VertexEmbeddingConfig {
    pub project_id: String,
    pub location: String,
    pub model: String,
    pub dimensions: usize,
    /// OAuth access token sent as a bearer token
    pub access_token: Option<String>,
    /// Overrides `https://<location>-aiplatform.googleapis.com`
    pub base_url: Option<String>,
}

impl VertexEmbeddingConfig {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            access_token: None,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Regional Vertex AI API root
pub(crate) fn regional_base_url(location: &str, base_url: Option<&str>) -> String {
    match base_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => format!("https://{}-aiplatform.googleapis.com", location),
    }
}

/// Embeds text with a Vertex AI publisher model via `:predict`
#[derive(Debug)]
pub struct VertexEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    config: VertexEmbeddingConfig,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> VertexEmbeddingProvider<C> {
    pub fn new(client: C, config: VertexEmbeddingConfig) -> Self {
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

    fn predict_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            regional_base_url(&self.config.location, self.config.base_url.as_deref()),
            self.config.project_id,
            self.config.location,
            self.config.model
        )
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let response: PredictResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("vertex", format!("Failed to parse embedding response: {}", e))
        })?;

        let values = response
            .predictions
            .into_iter()
            .next()
            .map(|prediction| prediction.embeddings.values)
            .ok_or_else(|| DomainError::provider("vertex", "Embedding response had no predictions"))?;

        if values.len() != self.config.dimensions {
            return Err(DomainError::provider(
                "vertex",
                format!(
                    "Expected {} embedding dimensions, got {}",
                    self.config.dimensions,
                    values.len()
                ),
            ));
        }

        Ok(values)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for VertexEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "instances": [{ "content": text }]
        });

        let response = self
            .client
            .post_json(&self.predict_url(), self.headers(), &body)
            .await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "vertex"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

// Vertex AI predict response types

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    embeddings: PredictionEmbeddings,
}

#[derive(Debug, Deserialize)]
struct PredictionEmbeddings {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::HttpClient;
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_URL: &str = "https://us-central1-aiplatform.googleapis.com/v1/projects/demo/locations/us-central1/publishers/google/models/textembedding-gecko@003:predict";

    fn predictions(dimensions: usize) -> serde_json::Value {
        let values: Vec<f32> = (0..dimensions).map(|i| i as f32 * 0.001).collect();
        json!({ "predictions": [{ "embeddings": { "values": values } }] })
    }

    #[tokio::test]
    async fn test_embed_parses_values() {
        let client = MockHttpClient::new().with_response(TEST_URL, predictions(768));
        let provider =
            VertexEmbeddingProvider::new(client, VertexEmbeddingConfig::new("demo", "us-central1"));

        let vector = provider.embed("hello").await.unwrap();

        assert_eq!(vector.len(), 768);
        assert_eq!(provider.model(), "textembedding-gecko@003");
    }

    #[tokio::test]
    async fn test_embed_rejects_wrong_dimensions() {
        let client = MockHttpClient::new().with_response(TEST_URL, predictions(12));
        let provider =
            VertexEmbeddingProvider::new(client, VertexEmbeddingConfig::new("demo", "us-central1"));

        assert!(provider.embed("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_predictions() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({ "predictions": [] }));
        let provider =
            VertexEmbeddingProvider::new(client, VertexEmbeddingConfig::new("demo", "us-central1"));

        assert!(provider.embed("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_embed_propagates_http_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 503");
        let provider =
            VertexEmbeddingProvider::new(client, VertexEmbeddingConfig::new("demo", "us-central1"));

        assert!(matches!(
            provider.embed("hello").await,
            Err(DomainError::Provider { .. })
        ));
    }

    #[tokio::test]
    async fn test_predict_request_contract() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(
                "/v1/projects/demo/locations/europe-west4/publishers/google/models/text-embedding-004:predict",
            ))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({ "instances": [{ "content": "market update" }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(predictions(4)))
            .expect(1)
            .mount(&server)
            .await;

        let config = VertexEmbeddingConfig::new("demo", "europe-west4")
            .with_model("text-embedding-004", 4)
            .with_access_token("secret")
            .with_base_url(server.uri());
        let provider = VertexEmbeddingProvider::new(HttpClient::new(), config);

        let vector = provider.embed("market update").await.unwrap();
        assert_eq!(vector.len(), 4);
    }
}
