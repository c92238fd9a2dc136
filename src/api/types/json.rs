//! JSON extractor whose rejections use the API error body

use axum::{
    Json as AxumJson,
    extract::{FromRequest, Request, rejection::JsonRejection as AxumJsonRejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::Json` that reports body errors as [`ApiError`]
///
/// Syntax errors and a missing content type map to 400, well-formed bodies
/// that do not fit the target type (missing or mistyped fields) to 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(rejection_to_error(&rejection)),
        }
    }
}

fn rejection_to_error(rejection: &AxumJsonRejection) -> ApiError {
    let (message, code) = match rejection {
        AxumJsonRejection::JsonDataError(err) => {
            (format!("Invalid JSON data: {}", err.body_text()), "invalid_body")
        }
        AxumJsonRejection::JsonSyntaxError(err) => {
            (format!("Invalid JSON syntax: {}", err.body_text()), "json_parse_error")
        }
        AxumJsonRejection::MissingJsonContentType(_) => (
            "Missing Content-Type header. Expected 'application/json'.".to_string(),
            "unsupported_media_type",
        ),
        AxumJsonRejection::BytesRejection(err) => (
            format!("Failed to read request body: {}", err.body_text()),
            "body_read_error",
        ),
        _ => ("Invalid JSON request".to_string(), "json_parse_error"),
    };

    let mut error = ApiError::bad_request(message).with_code(code);
    error.status = rejection.status();
    error
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
