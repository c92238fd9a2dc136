use std::any::Any;

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

use super::health;
use super::knowledge;
use super::middleware::{logging_middleware, metrics_middleware};
use super::run;
use super::state::AppState;
use super::types::ApiError;
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Orchestration
        .route("/run", post(run::run))
        .route("/run_sse", get(run::run_sse))
        // Knowledge tier
        .route("/knowledge/search", post(knowledge::search))
        .route("/knowledge/memories", post(knowledge::store_memory))
        .route("/knowledge/decisions", post(knowledge::store_decision))
        .with_state(state);

    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics));
    }

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!(detail, "Handler panicked");

    ApiError::internal("Internal server error").into_response()
}
