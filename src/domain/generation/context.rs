//! Inputs handed to a response generator

use crate::domain::knowledge::SearchResult;
use crate::domain::session::Session;

/// Everything known about a turn at generation time
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub session_id: String,
    pub message: String,
    /// Opaque agent configuration from the request
    pub agent_config: serde_json::Value,
    /// Previous turn from the hot tier, `None` on a first turn or cache failure
    pub prior_turn: Option<Session>,
    /// Knowledge hits from the cold tier, best first
    pub knowledge: Vec<SearchResult>,
}

impl GenerationContext {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_agent_config(mut self, agent_config: serde_json::Value) -> Self {
        self.agent_config = agent_config;
        self
    }

    pub fn with_prior_turn(mut self, prior_turn: Option<Session>) -> Self {
        self.prior_turn = prior_turn;
        self
    }

    pub fn with_knowledge(mut self, knowledge: Vec<SearchResult>) -> Self {
        self.knowledge = knowledge;
        self
    }
}
