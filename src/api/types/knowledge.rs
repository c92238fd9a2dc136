//! Knowledge endpoint bodies

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;
use crate::domain::knowledge::{MemoryKind, Metadata, SearchResult};

/// Body of `POST /knowledge/search`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(custom(function = "not_blank"))]
    pub query: String,
    /// Capped by the client's configured maximum
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Body of `POST /knowledge/memories`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreMemoryRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: MemoryKind,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Body of `POST /knowledge/decisions`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreDecisionRequest {
    #[validate(custom(function = "not_blank"))]
    pub reasoning: String,
    #[validate(custom(function = "not_blank"))]
    pub decision: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMemoryResponse {
    pub id: String,
}
