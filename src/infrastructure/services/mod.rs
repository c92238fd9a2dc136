//! Infrastructure services

mod hot_state_service;
mod knowledge_service;
mod orchestrator_service;

pub use hot_state_service::{HotStateClient, HotStateConfig};
pub use knowledge_service::{KnowledgeClient, KnowledgeConfig};
pub use orchestrator_service::{
    ColdLookupPolicy, Orchestrator, OrchestratorConfig, RunInput, RunOutput,
};
