//! Application error type mapping to HTTP status codes and envelope format.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use vasculargpt_types::error::PipelineError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The answering pipeline failed; the raw error is surfaced.
    Pipeline(PipelineError),
    /// Malformed request input.
    Validation(String),
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        AppError::Pipeline(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Pipeline(e) if e.is_configuration() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                e.to_string(),
            ),
            AppError::Pipeline(e) => (StatusCode::BAD_GATEWAY, "SERVICE_ERROR", e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ApiResponse::error(code, &message, Uuid::now_v7().to_string(), 0);
        (status, body).into_response()
    }
}
