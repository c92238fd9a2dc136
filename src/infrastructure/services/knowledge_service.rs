//! Cold-state client - fail-soft semantic search and memory ingestion

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::knowledge::{
    KnowledgeRecord, Metadata, MemoryKind, SearchResult, VectorIndex, decision_log_text,
    generate_memory_id,
};
use crate::domain::session::now_millis;
use crate::domain::{DomainError, FailSoft};
use crate::infrastructure::observability::record_knowledge_op;

/// Limits applied to knowledge searches
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    /// Limit used when a caller does not pass one
    pub default_limit: usize,
    /// Hard cap on any requested limit
    pub max_limit: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 50,
        }
    }
}

/// Fail-soft client over an embedding provider and a vector index
///
/// Searches never error: any failure yields an empty result list. Writes
/// report failures through [`FailSoft`].
#[derive(Debug, Clone)]
pub struct KnowledgeClient {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    config: KnowledgeConfig,
}

impl KnowledgeClient {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self::with_config(embeddings, index, KnowledgeConfig::default())
    }

    pub fn with_config(
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: KnowledgeConfig,
    ) -> Self {
        Self {
            embeddings,
            index,
            config,
        }
    }

    pub fn default_limit(&self) -> usize {
        self.config.default_limit
    }

    pub fn index_backend(&self) -> &'static str {
        self.index.backend()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let vector = self.embeddings.embed(text).await?;

        if vector.is_empty() || vector.len() != self.embeddings.dimensions() {
            return Err(DomainError::provider(
                self.embeddings.provider_name(),
                format!(
                    "Embedding has {} dimensions, expected {}",
                    vector.len(),
                    self.embeddings.dimensions()
                ),
            ));
        }

        Ok(vector)
    }

    /// Embeds text with the configured model
    pub async fn generate_embedding(&self, text: &str) -> FailSoft<Vec<f32>> {
        let started = Instant::now();

        match self.embed(text).await {
            Ok(vector) => {
                record_knowledge_op("embed", true, started.elapsed());
                FailSoft::Value(vector)
            }
            Err(e) => {
                warn!(
                    provider = self.embeddings.provider_name(),
                    error = %e,
                    "Embedding generation failed"
                );
                record_knowledge_op("embed", false, started.elapsed());
                FailSoft::Failed(e.to_string())
            }
        }
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, DomainError> {
        let vector = self.embed(query).await?;
        let matches = self.index.query(&vector, limit).await?;

        let mut results: Vec<SearchResult> = matches.into_iter().map(SearchResult::from).collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);

        Ok(results)
    }

    /// Returns up to `limit` results, best first
    ///
    /// Blank queries, a zero limit and every backend failure yield an empty list.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let limit = limit.min(self.config.max_limit);

        if query.trim().is_empty() || limit == 0 {
            return Vec::new();
        }

        let started = Instant::now();

        match self.try_search(query, limit).await {
            Ok(results) => {
                debug!(hits = results.len(), limit, "Knowledge search completed");
                record_knowledge_op("search", true, started.elapsed());
                results
            }
            Err(e) => {
                warn!(
                    index = self.index.backend(),
                    error = %e,
                    "Knowledge search failed, continuing without results"
                );
                record_knowledge_op("search", false, started.elapsed());
                Vec::new()
            }
        }
    }

    /// Inserts or replaces a vector by id
    pub async fn upsert_embedding(
        &self,
        id: &str,
        vector: Vec<f32>,
        metadata: Option<Metadata>,
    ) -> FailSoft<()> {
        if id.trim().is_empty() {
            return FailSoft::Failed("Record id must not be empty".to_string());
        }

        if vector.is_empty() {
            return FailSoft::Failed("Vector must not be empty".to_string());
        }

        let started = Instant::now();
        let record = KnowledgeRecord::new(id, vector).with_metadata(metadata.unwrap_or_default());

        match self.index.upsert(vec![record]).await {
            Ok(()) => {
                record_knowledge_op("upsert", true, started.elapsed());
                FailSoft::Value(())
            }
            Err(e) => {
                warn!(index = self.index.backend(), id, error = %e, "Knowledge upsert failed");
                record_knowledge_op("upsert", false, started.elapsed());
                FailSoft::Failed(e.to_string())
            }
        }
    }

    /// Removes vectors by id; an empty id list is a no-op
    pub async fn delete_embeddings(&self, ids: &[String]) -> FailSoft<()> {
        if ids.is_empty() {
            return FailSoft::Value(());
        }

        let started = Instant::now();

        match self.index.remove(ids).await {
            Ok(()) => {
                record_knowledge_op("remove", true, started.elapsed());
                FailSoft::Value(())
            }
            Err(e) => {
                warn!(
                    index = self.index.backend(),
                    count = ids.len(),
                    error = %e,
                    "Knowledge remove failed"
                );
                record_knowledge_op("remove", false, started.elapsed());
                FailSoft::Failed(e.to_string())
            }
        }
    }

    /// Embeds and stores a memory, returning its generated id
    ///
    /// The stored metadata always carries `text`, `type` and `timestamp`;
    /// caller metadata cannot override them.
    pub async fn store_memory(
        &self,
        text: &str,
        kind: MemoryKind,
        metadata: Metadata,
    ) -> FailSoft<String> {
        if text.trim().is_empty() {
            return FailSoft::Failed("Memory text must not be empty".to_string());
        }

        let vector = match self.generate_embedding(text).await {
            FailSoft::Value(vector) => vector,
            FailSoft::Absent => return FailSoft::Absent,
            FailSoft::Failed(reason) => return FailSoft::Failed(reason),
        };

        let timestamp = now_millis();
        let id = generate_memory_id(timestamp);

        let mut metadata = metadata;
        metadata.insert("text".to_string(), json!(text));
        metadata.insert("type".to_string(), json!(kind.as_str()));
        metadata.insert("timestamp".to_string(), json!(timestamp));

        self.upsert_embedding(&id, vector, Some(metadata))
            .await
            .map(|()| {
                info!(id = %id, kind = %kind, "Stored memory");
                id
            })
    }

    /// Stores a reasoning/decision pair as a `decision` memory
    pub async fn store_decision_log(
        &self,
        reasoning: &str,
        decision: &str,
        metadata: Metadata,
    ) -> FailSoft<String> {
        self.store_memory(
            &decision_log_text(reasoning, decision),
            MemoryKind::Decision,
            metadata,
        )
        .await
    }

    /// Whether the vector index currently answers
    pub async fn is_healthy(&self) -> bool {
        match self.index.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(index = self.index.backend(), error = %e, "Knowledge store unhealthy");
                false
            }
        }
    }
}
