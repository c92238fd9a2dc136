//! Per-session conversation state kept in the hot tier

use serde::{Deserialize, Serialize};

/// Last turn of a session, stored under `session:<id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Older writers stored only the message and timestamp
    #[serde(default)]
    pub session_id: String,
    pub last_message: String,
    /// Epoch milliseconds of the write
    pub timestamp: i64,
}

impl Session {
    /// Creates a session snapshot stamped with the current time
    pub fn new(session_id: impl Into<String>, last_message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            last_message: last_message.into(),
            timestamp: now_millis(),
        }
    }
}

/// Current wall clock in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
