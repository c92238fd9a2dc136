//! Vector index trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{KnowledgeRecord, VectorMatch};
use crate::domain::DomainError;

/// Nearest-neighbor store behind the cold-state tier
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Short backend identifier used in logs and metrics
    fn backend(&self) -> &'static str;

    /// Returns up to `top_k` neighbors of `vector`, closest first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError>;

    /// Inserts or replaces records by id
    async fn upsert(&self, records: Vec<KnowledgeRecord>) -> Result<(), DomainError>;

    /// Removes records by id, ignoring ids that are not present
    async fn remove(&self, ids: &[String]) -> Result<(), DomainError>;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> Result<(), DomainError>;
}
