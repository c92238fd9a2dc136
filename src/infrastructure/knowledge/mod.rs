//! Vector index implementations for the cold-state tier

mod factory;
mod in_memory;
mod vertex;

pub use factory::{IndexBackend, create_vector_index};
pub use in_memory::InMemoryVectorIndex;
pub use vertex::{DistanceMeasure, VertexVectorIndex, VertexVectorIndexConfig};
