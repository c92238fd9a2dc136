//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::keep_alive::KeepAliveTracker;
use crate::infrastructure::services::{HotStateClient, KnowledgeClient, Orchestrator};

/// Shared handles, constructed once at startup and cloned per request
#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub keep_alive: KeepAliveTracker,
    pub keep_alive_interval: Duration,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            keep_alive: KeepAliveTracker::new(),
            keep_alive_interval: Duration::from_secs(30),
            service_name: service_name.into(),
        }
    }

    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    pub fn hot_state(&self) -> &HotStateClient {
        self.orchestrator.hot_state()
    }

    pub fn knowledge(&self) -> &KnowledgeClient {
        self.orchestrator.knowledge()
    }
}
