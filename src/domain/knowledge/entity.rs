//! Knowledge records and search results

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Free-form record metadata (strings and JSON scalars)
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata keys consulted, in order, when resolving a result's content
const CONTENT_KEYS: [&str; 2] = ["text", "content"];

/// A vector stored in the cold tier
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
}

impl KnowledgeRecord {
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Raw neighbor returned by a vector index
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: String,
    /// Similarity where larger means closer; not guaranteed to be in [0, 1]
    pub score: f32,
    pub metadata: Metadata,
}

/// A knowledge hit returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    /// Relevance in [0, 1]
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl From<VectorMatch> for SearchResult {
    fn from(hit: VectorMatch) -> Self {
        let content = CONTENT_KEYS
            .iter()
            .find_map(|key| hit.metadata.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| hit.id.clone());

        let score = if hit.score.is_nan() {
            0.0
        } else {
            hit.score.clamp(0.0, 1.0)
        };

        Self {
            content,
            score,
            metadata: (!hit.metadata.is_empty()).then_some(hit.metadata),
        }
    }
}
