//! Tiered-state orchestrator
//!
//! Serves agent turns backed by two state tiers:
//! - Hot state: short-lived session context in Redis or an in-process cache
//! - Cold state: semantic search over a vector index of embedded memories
//!
//! Both tiers are fail-soft; a turn always produces a response.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use infrastructure::cache::{CacheConfig, CacheFactory};
use infrastructure::embedding::create_embedding_provider;
use infrastructure::generation::TemplateResponseGenerator;
use infrastructure::knowledge::create_vector_index;
use infrastructure::services::{
    HotStateClient, HotStateConfig, KnowledgeClient, KnowledgeConfig, Orchestrator,
    OrchestratorConfig,
};
use tracing::info;

/// Create the application state with custom configuration
///
/// Connects to the hot-state backend (falling back to memory when allowed)
/// and builds the cold-state clients. No global handles are created.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = CacheFactory::new()
        .create(&CacheConfig::from_settings(&config.hot_state))
        .await?;
    let hot_state = HotStateClient::with_config(
        cache,
        HotStateConfig::default()
            .with_session_ttl(Duration::from_secs(config.hot_state.session_ttl_secs)),
    );

    let cold = &config.cold_state;
    let knowledge = KnowledgeClient::with_config(
        create_embedding_provider(cold)?,
        create_vector_index(cold)?,
        KnowledgeConfig {
            default_limit: cold.default_limit,
            max_limit: cold.max_limit,
        },
    );

    let orchestrator = Orchestrator::new(
        hot_state,
        knowledge,
        Arc::new(TemplateResponseGenerator::new()),
        OrchestratorConfig {
            cold_lookup: config.orchestrator.cold_lookup,
            knowledge_limit: config.orchestrator.knowledge_limit,
            fallback_response: config.orchestrator.fallback_response.clone(),
        },
    );

    info!(
        hot_state = orchestrator.hot_state().backend(),
        cold_state = orchestrator.knowledge().index_backend(),
        cold_lookup = %config.orchestrator.cold_lookup,
        "Application state initialized"
    );

    Ok(AppState::new(orchestrator, config.server.service_name.as_str())
        .with_keep_alive_interval(Duration::from_secs(config.orchestrator.keep_alive_secs)))
}
