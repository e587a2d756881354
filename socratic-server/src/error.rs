//! Errors for routes that do not use the `success` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use socratic_core::TutorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Tutor(#[from] TutorError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let ServerError::Tutor(err) = &self;
        tracing::error!(error = %err, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal server error" })),
        )
            .into_response()
    }
}
