//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::source::SourceError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] SourceError),

    #[error("Engine error: {0}")]
    Engine(#[from] campus_engine::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use campus_engine::Error as EngineError;

        let (status, error_message, details) = match &self {
            AppError::Upstream(SourceError::Status { status: 404, .. }) => {
                (StatusCode::NOT_FOUND, "Record not found".to_string(), None)
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream API unavailable".to_string(),
                    Some(serde_json::Value::String(e.to_string())),
                )
            }
            AppError::Engine(EngineError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::Engine(e @ EngineError::UnknownEntity(_)) => {
                (StatusCode::NOT_FOUND, e.to_string(), None)
            }
            AppError::Engine(e) => {
                tracing::warn!("Engine error: {:?}", e);
                (StatusCode::BAD_REQUEST, e.to_string(), None)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
