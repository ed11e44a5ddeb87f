//! Error types for vslm-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vslm_control::ActionError;
use vslm_registry::RegistryError;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] RegistryError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict (denied lifecycle transition)
    #[error("{0}")]
    Conflict(String),

    /// Collaborator timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(RegistryError),
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::NotFound(id) => {
                ApiError::NotFound(format!("Server with ID '{}' not found.", id.as_uuid()))
            }
            ActionError::Denied { reason } => ApiError::Conflict(reason),
            ActionError::DeadlineExceeded => {
                ApiError::Timeout("action deadline exceeded".to_string())
            }
            ActionError::Store(e) => ApiError::from(e),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => {
                ApiError::NotFound(format!("Server with ID '{}' not found.", id.as_uuid()))
            }
            RegistryError::Timeout(msg) => ApiError::Timeout(msg),
            other => ApiError::Storage(other),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use vslm_types::ServerId;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );

        assert_eq!(
            ApiError::BadRequest("test".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            ApiError::Conflict("test".to_string())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );

        assert_eq!(
            ApiError::Timeout("test".to_string())
                .into_response()
                .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_denied_action_maps_to_conflict() {
        let err = ApiError::from(ActionError::Denied {
            reason: "Server is already stopped.".to_string(),
        });
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.to_string(), "Server is already stopped.");
    }

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = ApiError::from(ActionError::Store(RegistryError::NotFound(
            ServerId::generate(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
