//! Orchestration request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::not_blank;
use crate::infrastructure::services::{RunInput, RunOutput};

/// Body of `POST /run`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[validate(custom(function = "not_blank"))]
    pub session_id: String,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
    /// Passed through to the generator untouched
    #[serde(default)]
    pub agent_config: Value,
}

impl From<RunRequest> for RunInput {
    fn from(request: RunRequest) -> Self {
        Self {
            session_id: request.session_id,
            message: request.message,
            agent_config: request.agent_config,
        }
    }
}

/// Body returned by `POST /run`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub session_id: String,
    pub response: String,
    pub timestamp: i64,
}

impl From<RunOutput> for RunResponse {
    fn from(output: RunOutput) -> Self {
        Self {
            session_id: output.session_id,
            response: output.response,
            timestamp: output.timestamp,
        }
    }
}
