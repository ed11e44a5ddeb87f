//! Registry error types

use thiserror::Error;
use vslm_types::ServerId;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Server not found: {0}")]
    NotFound(ServerId),

    #[error("Server already exists: {0}")]
    AlreadyExists(ServerId),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// Collaborator did not answer within its bounded timeout
    #[error("Storage timeout: {0}")]
    Timeout(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
