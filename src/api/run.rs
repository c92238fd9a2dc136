//! Orchestration endpoints

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::{Stream, StreamExt};
use tracing::{debug, info};
use validator::Validate;

use super::state::AppState;
use super::types::{ApiError, Json, RunRequest, RunResponse};

/// `POST /run`
///
/// Input is validated before any cache access. Collaborator failures never
/// surface here; the orchestrator degrades instead.
pub async fn run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    request.validate()?;

    debug!(session_id = %request.session_id, "Running turn");
    let output = state.orchestrator.run(request.into()).await;

    Ok(Json(RunResponse::from(output)))
}

/// `GET /run_sse`
///
/// The keep-alive timer lives inside the returned stream and is released
/// when axum drops the body on disconnect.
pub async fn run_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.keep_alive.stream(state.keep_alive_interval);
    info!(active = state.keep_alive.active(), "Streaming client connected");

    Sse::new(stream.map(|frame| Ok(Event::default().data(frame.payload().to_string()))))
}
