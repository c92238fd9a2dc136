//! Knowledge endpoints

use axum::{extract::State, http::StatusCode};
use validator::Validate;

use super::state::AppState;
use super::types::{
    ApiError, Json, SearchRequest, SearchResponse, StoreDecisionRequest, StoreMemoryRequest,
    StoredMemoryResponse,
};
use crate::domain::FailSoft;

/// `POST /knowledge/search`; an unavailable store yields an empty list
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    request.validate()?;

    let knowledge = state.knowledge();
    let limit = request.limit.unwrap_or_else(|| knowledge.default_limit());
    let results = knowledge.search(&request.query, limit).await;

    Ok(Json(SearchResponse { results }))
}

/// `POST /knowledge/memories`
pub async fn store_memory(
    State(state): State<AppState>,
    Json(request): Json<StoreMemoryRequest>,
) -> Result<(StatusCode, Json<StoredMemoryResponse>), ApiError> {
    request.validate()?;

    let outcome = state
        .knowledge()
        .store_memory(&request.text, request.kind, request.metadata)
        .await;

    created(outcome)
}

/// `POST /knowledge/decisions`
pub async fn store_decision(
    State(state): State<AppState>,
    Json(request): Json<StoreDecisionRequest>,
) -> Result<(StatusCode, Json<StoredMemoryResponse>), ApiError> {
    request.validate()?;

    let outcome = state
        .knowledge()
        .store_decision_log(&request.reasoning, &request.decision, request.metadata)
        .await;

    created(outcome)
}

fn created(outcome: FailSoft<String>) -> Result<(StatusCode, Json<StoredMemoryResponse>), ApiError> {
    match outcome {
        FailSoft::Value(id) => Ok((StatusCode::CREATED, Json(StoredMemoryResponse { id }))),
        FailSoft::Absent => Err(ApiError::unavailable("Knowledge store unavailable")),
        FailSoft::Failed(reason) => Err(ApiError::unavailable(format!(
            "Knowledge store unavailable: {}",
            reason
        ))),
    }
}
