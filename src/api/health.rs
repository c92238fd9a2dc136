//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use super::types::Json;

/// Health response with optional component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub backend: String,
    pub latency_ms: u64,
}

/// Returns 200 whenever the process is serving
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        service: state.service_name.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Probes both tiers
///
/// One tier down is `degraded` and still 200, since turns keep working
/// without it. Both down is `unhealthy` and 503.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let (hot_state, cold_state) = tokio::join!(check_hot_state(&state), check_cold_state(&state));
    let checks = vec![hot_state, cold_state];

    let unhealthy = checks
        .iter()
        .filter(|c| c.status != HealthStatus::Healthy)
        .count();
    let overall_status = match unhealthy {
        0 => HealthStatus::Healthy,
        n if n < checks.len() => HealthStatus::Degraded,
        _ => HealthStatus::Unhealthy,
    };

    let response = HealthResponse {
        status: overall_status,
        service: state.service_name.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

fn component(name: &str, backend: &str, healthy: bool, start: Instant) -> HealthCheck {
    HealthCheck {
        name: name.to_string(),
        status: if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        backend: backend.to_string(),
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

async fn check_hot_state(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let hot_state = state.hot_state();
    let healthy = hot_state.is_healthy().await;

    component("hot_state", hot_state.backend(), healthy, start)
}

async fn check_cold_state(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let knowledge = state.knowledge();
    let healthy = knowledge.is_healthy().await;

    component("cold_state", knowledge.index_backend(), healthy, start)
}
