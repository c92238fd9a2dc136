//! Agent memories stored in the knowledge tier

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Category of a stored memory, kept in the `type` metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Decision,
    Trade,
    #[default]
    Conversation,
    Insight,
}

impl MemoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Trade => "trade",
            Self::Conversation => "conversation",
            Self::Insight => "insight",
        }
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "decision" => Ok(Self::Decision),
            "trade" => Ok(Self::Trade),
            "conversation" => Ok(Self::Conversation),
            "insight" => Ok(Self::Insight),
            other => Err(DomainError::validation(format!(
                "Unknown memory type '{}'. Valid types: decision, trade, conversation, insight",
                other
            ))),
        }
    }
}

/// Generates a memory id of the form `mem_<epoch millis>_<random suffix>`
pub fn generate_memory_id(now_millis: i64) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("mem_{}_{}", now_millis, suffix)
}

/// Text stored for a decision log entry
pub fn decision_log_text(reasoning: &str, decision: &str) -> String {
    format!("Reasoning: {}\nDecision: {}", reasoning, decision)
}
