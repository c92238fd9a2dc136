//! Orchestration of one agent turn across the hot and cold tiers

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{HotStateClient, KnowledgeClient};
use crate::domain::generation::{GenerationContext, ResponseGenerator};
use crate::domain::knowledge::SearchResult;
use crate::domain::{DomainError, FailSoft, Session};

/// When the cold tier is consulted during a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdLookupPolicy {
    /// Every turn, concurrently with the hot lookup
    #[default]
    Always,
    /// Only when the hot tier has no prior turn
    OnHotMiss,
    /// Never
    Never,
}

impl FromStr for ColdLookupPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "on_hot_miss" | "onhotmiss" => Ok(Self::OnHotMiss),
            "never" => Ok(Self::Never),
            other => Err(DomainError::configuration(format!(
                "Unknown cold lookup policy: {}. Valid policies: always, on_hot_miss, never",
                other
            ))),
        }
    }
}

impl fmt::Display for ColdLookupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::OnHotMiss => write!(f, "on_hot_miss"),
            Self::Never => write!(f, "never"),
        }
    }
}

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub cold_lookup: ColdLookupPolicy,
    /// Knowledge hits requested per turn
    pub knowledge_limit: usize,
    /// Reply used when generation fails
    pub fallback_response: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cold_lookup: ColdLookupPolicy::default(),
            knowledge_limit: 5,
            fallback_response: "I'm having trouble responding right now. Please try again shortly."
                .to_string(),
        }
    }
}

/// A validated turn
#[derive(Debug, Clone)]
pub struct RunInput {
    pub session_id: String,
    pub message: String,
    pub agent_config: serde_json::Value,
}

/// Outcome of a turn
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub session_id: String,
    pub response: String,
    /// Epoch millis, identical to the timestamp written back to the hot tier
    pub timestamp: i64,
    /// Generation failed and the fallback text was returned
    pub degraded: bool,
    pub prior_turn_found: bool,
    pub knowledge_hits: usize,
}

/// Sequences hot lookup, cold lookup, generation and hot write-back
///
/// `run` never fails: collaborator errors are logged and absorbed.
#[derive(Clone)]
pub struct Orchestrator {
    hot_state: HotStateClient,
    knowledge: KnowledgeClient,
    generator: Arc<dyn ResponseGenerator>,
    config: OrchestratorConfig,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("hot_state", &self.hot_state)
            .field("knowledge", &self.knowledge)
            .field("generator", &self.generator.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(
        hot_state: HotStateClient,
        knowledge: KnowledgeClient,
        generator: Arc<dyn ResponseGenerator>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            hot_state,
            knowledge,
            generator,
            config,
        }
    }

    pub fn hot_state(&self) -> &HotStateClient {
        &self.hot_state
    }

    pub fn knowledge(&self) -> &KnowledgeClient {
        &self.knowledge
    }

    async fn lookup(&self, input: &RunInput) -> (FailSoft<Session>, Vec<SearchResult>) {
        let limit = self.config.knowledge_limit;

        match self.config.cold_lookup {
            ColdLookupPolicy::Always => tokio::join!(
                self.hot_state.get_session(&input.session_id),
                self.knowledge.search(&input.message, limit)
            ),
            ColdLookupPolicy::OnHotMiss => {
                let prior = self.hot_state.get_session(&input.session_id).await;
                let knowledge = if prior.is_value() {
                    Vec::new()
                } else {
                    self.knowledge.search(&input.message, limit).await
                };
                (prior, knowledge)
            }
            ColdLookupPolicy::Never => {
                (self.hot_state.get_session(&input.session_id).await, Vec::new())
            }
        }
    }

    /// Runs one turn
    pub async fn run(&self, input: RunInput) -> RunOutput {
        let (prior, knowledge) = self.lookup(&input).await;

        if prior.is_failed() {
            debug!(
                session_id = %input.session_id,
                "Hot-state unavailable, treating turn as first turn"
            );
        }

        let prior_turn = prior.value();
        let prior_turn_found = prior_turn.is_some();
        let knowledge_hits = knowledge.len();

        let context = GenerationContext::new(&input.session_id, &input.message)
            .with_agent_config(input.agent_config)
            .with_prior_turn(prior_turn)
            .with_knowledge(knowledge);

        let (response, degraded) = match self.generator.generate(&context).await {
            Ok(response) => (response, false),
            Err(e) => {
                warn!(
                    session_id = %input.session_id,
                    generator = self.generator.name(),
                    error = %e,
                    "Response generation failed, returning fallback"
                );
                (self.config.fallback_response.clone(), true)
            }
        };

        // Written on every turn, including degraded ones
        let session = Session::new(input.session_id, input.message);
        if !self.hot_state.put_session(&session).await.succeeded() {
            warn!(session_id = %session.session_id, "Session write-back failed");
        }

        info!(
            session_id = %session.session_id,
            prior_turn_found,
            knowledge_hits,
            degraded,
            "Turn completed"
        );

        RunOutput {
            session_id: session.session_id,
            response,
            timestamp: session.timestamp,
            degraded,
            prior_turn_found,
            knowledge_hits,
        }
    }
}
