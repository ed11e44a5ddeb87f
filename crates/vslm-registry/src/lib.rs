//! VSLM Registry - Server directory and audit trail
//!
//! This crate provides the storage infrastructure for VSLM:
//!
//! - **ServerStore**: Durable storage contract for server records
//! - **AuditLog**: Append-only storage contract for lifecycle events
//! - **ServerDirectory**: Creation policy and lookup over an injected store
//!
//! ## In-Memory vs Persistent
//!
//! The in-memory implementations are suitable for development and testing.
//! Production deployments use the PostgreSQL backend, which implements the
//! same traits. Stores are always passed in explicitly; there is no
//! process-wide storage handle.

#![deny(unsafe_code)]

pub mod audit;
pub mod directory;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-exports
pub use audit::AuditLog;
pub use directory::{NewServer, ServerDirectory};
pub use error::{RegistryError, Result};
pub use memory::{InMemoryAuditLog, InMemoryServerStore};
pub use postgres::PostgresStore;
pub use store::ServerStore;
