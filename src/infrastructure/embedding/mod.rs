//! Embedding provider implementations

mod factory;
mod hashing;
mod vertex;

pub use factory::{EmbeddingBackend, create_embedding_provider};
pub use hashing::HashingEmbeddingProvider;
pub use vertex::{VertexEmbeddingConfig, VertexEmbeddingProvider};

pub(crate) use vertex::regional_base_url;
