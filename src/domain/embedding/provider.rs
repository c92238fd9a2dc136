//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for text embedding models (Vertex AI, local hashing, ...)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate a fixed-length embedding for the given text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model this provider embeds with
    fn model(&self) -> &str;

    /// Length of every vector this provider returns
    fn dimensions(&self) -> usize;
}
