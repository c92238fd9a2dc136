//! In-memory vector index for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::embedding::cosine_similarity;
use crate::domain::knowledge::{KnowledgeRecord, VectorIndex, VectorMatch};

/// Brute-force cosine index keyed by record id
#[derive(Debug, Clone)]
pub struct InMemoryVectorIndex {
    dimensions: usize,
    records: Arc<RwLock<HashMap<String, KnowledgeRecord>>>,
}

impl InMemoryVectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != self.dimensions {
            return Err(DomainError::knowledge_base(format!(
                "Vector has {} dimensions, index expects {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn backend(&self) -> &'static str {
        "in_memory"
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError> {
        self.check_dimensions(vector)?;
        let records = self.records.read().await;

        let mut matches: Vec<VectorMatch> = records
            .values()
            .map(|record| VectorMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.vector),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn upsert(&self, records: Vec<KnowledgeRecord>) -> Result<(), DomainError> {
        for record in &records {
            self.check_dimensions(&record.vector)?;
        }

        let mut stored = self.records.write().await;
        for record in records {
            stored.insert(record.id.clone(), record);
        }

        Ok(())
    }

    async fn remove(&self, ids: &[String]) -> Result<(), DomainError> {
        let mut stored = self.records.write().await;
        for id in ids {
            stored.remove(id);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
