//! Request and response types for the HTTP API

pub mod error;
pub mod json;
pub mod knowledge;
pub mod run;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use knowledge::{
    SearchRequest, SearchResponse, StoreDecisionRequest, StoreMemoryRequest, StoredMemoryResponse,
};
pub use run::{RunRequest, RunResponse};

use validator::ValidationError;

/// Rejects empty and whitespace-only strings
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }

    Ok(())
}
