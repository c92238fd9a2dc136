//! Cold-state knowledge domain - records, search results and the vector index seam

mod entity;
mod index;
mod memory;

pub use entity::{KnowledgeRecord, Metadata, SearchResult, VectorMatch};
pub use index::VectorIndex;
pub use memory::{decision_log_text, generate_memory_id, MemoryKind};

#[cfg(test)]
pub use index::mock::MockVectorIndex;
