use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::error::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::RequestInvalid(msg) => AppError::Validation(msg.clone()),
            PipelineError::ProviderFatal { .. } => AppError::ProviderUnavailable(err.to_string()),
            PipelineError::GenerationFailed { .. } => AppError::Generation(err.to_string()),
            PipelineError::Cancelled { .. } => AppError::Cancelled(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ProviderUnavailable(detail) => {
                tracing::error!("Provider error: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "PROVIDER_UNAVAILABLE",
                    "The AI provider is not available. Check the server configuration.".to_string(),
                )
            }
            AppError::Generation(detail) => {
                tracing::error!("Generation error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    "The AI could not produce a valid response. Please try again.".to_string(),
                )
            }
            AppError::Cancelled(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CANCELLED",
                detail.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
