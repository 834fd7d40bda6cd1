//! Error types for sihook
//!
//! Taxonomy:
//! - configuration and payload errors are raised to the caller
//! - transport errors are contained by the sync controller
//! - resolution errors are logged and raised
//! - date, geometry and list parse errors never leave the assembler

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the search index
#[derive(Debug, Error)]
pub enum TransportError {
    /// Index answered with a non-success status
    #[error("Request failed with: {status} {body}")]
    Status { status: u16, body: String },

    /// Index could not be reached (connect, timeout, protocol)
    #[error("Endpoint is not available: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TransportError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => TransportError::Connection(err.to_string()),
        }
    }
}

/// Errors raised by the hook pipeline
#[derive(Debug, Error)]
pub enum HookError {
    /// Missing or malformed configuration
    #[error(transparent)]
    Config(#[from] sihook_common::Error),

    /// Dataset record lacks the embedded payload or its mandatory keys
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// Search index unreachable or rejecting the request
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Identifier could not be resolved to a dataset
    #[error("Dataset for id {id} was not found: {reason}")]
    Resolution { id: String, reason: String },

    /// License registry lookup failed
    #[error("License registry error: {0}")]
    Registry(String),
}

/// Result type for hook operations
pub type HookResult<T> = Result<T, HookError>;

/// API error type for the hook endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Hook pipeline error
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Hook(HookError::Config(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            ApiError::Hook(HookError::Payload(_)) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            ApiError::Hook(HookError::Resolution { .. }) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Hook(HookError::Transport(_)) => (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR"),
            ApiError::Hook(HookError::Registry(_)) => (StatusCode::BAD_GATEWAY, "REGISTRY_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
