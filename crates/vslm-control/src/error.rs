//! Error types for the control plane

use thiserror::Error;
use vslm_registry::RegistryError;
use vslm_types::ServerId;

/// Control plane error type
#[derive(Debug, Error)]
pub enum ActionError {
    /// Server id is unknown
    #[error("Server not found: {0}")]
    NotFound(ServerId),

    /// The lifecycle rules reject the action from the current status
    #[error("{reason}")]
    Denied { reason: String },

    /// Storage collaborator failed
    #[error("Storage error: {0}")]
    Store(#[from] RegistryError),

    /// Caller-supplied deadline expired before the persistence write
    #[error("Deadline exceeded before the status write was issued")]
    DeadlineExceeded,
}

/// Result type for control plane operations
pub type Result<T> = std::result::Result<T, ActionError>;
