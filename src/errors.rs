use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Longest failure description echoed back to clients
pub const MAX_DETAIL_CHARS: usize = 50;

/// Body of every error surfaced to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Failures of the model-backed generation path. All of these are absorbed by the
/// fallback and never reach a client.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation backend unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid generation backend payload: {0}")]
    InvalidPayload(String),

    #[error("Cannot parse JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Schema validation failed: {0}")]
    Schema(#[source] serde_json::Error),
}

impl GenerationError {
    /// Short machine-readable tag for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Request(e) if e.is_timeout() => "timeout",
            GenerationError::Request(_) => "request",
            GenerationError::Status { .. } => "status",
            GenerationError::InvalidPayload(_) => "invalid_payload",
            GenerationError::InvalidJson(_) => "invalid_json",
            GenerationError::Schema(_) => "schema",
        }
    }
}

/// Centralized error types for consistent API error handling
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Upload failed: {0}")]
    UploadError(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Error context for structured logging
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub resource_id: Option<String>,
    pub resource_type: String,
}

impl ErrorContext {
    pub fn new(operation: &str, resource_type: &str) -> Self {
        Self {
            operation: operation.to_string(),
            resource_id: None,
            resource_type: resource_type.to_string(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }
}

impl ApiError {
    /// Convert API error to HTTP response with consistent structure and logging
    pub fn to_response_with_context(
        self,
        context: ErrorContext,
    ) -> (StatusCode, Json<ErrorResponse>) {
        match &self {
            ApiError::BadRequest(message) => {
                warn!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Bad request"
                );
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        detail: message.clone(),
                    }),
                )
            }
            ApiError::InvalidBody(rejection) => {
                warn!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Invalid request body"
                );
                (
                    rejection.status(),
                    Json(ErrorResponse {
                        detail: rejection.body_text(),
                    }),
                )
            }
            ApiError::GenerationFailed(cause) => {
                error!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Generation failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        detail: format!("Generation failed: {}", truncate_detail(cause)),
                    }),
                )
            }
            ApiError::UploadError(cause) => {
                error!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Upload failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        detail: format!("Upload failed: {}", truncate_detail(&cause.to_string())),
                    }),
                )
            }
            ApiError::InternalError(cause) => {
                error!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Internal server error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        detail: truncate_detail(&cause.to_string()),
                    }),
                )
            }
        }
    }
}

/// Truncate a failure description to `MAX_DETAIL_CHARS` characters
pub fn truncate_detail(detail: &str) -> String {
    detail.chars().take(MAX_DETAIL_CHARS).collect()
}
