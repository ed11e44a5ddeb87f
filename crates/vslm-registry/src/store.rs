//! Server storage trait
//!
//! Implementations must provide read-your-writes for a given id: a `get`
//! after a successful `save` observes the saved record. The orchestrator's
//! read-decide-write sequence depends on it.

use crate::error::Result;
use async_trait::async_trait;
use vslm_types::{Server, ServerId};

/// Durable storage for server records
#[async_trait]
pub trait ServerStore: Send + Sync {
    /// Insert a new server; fails if the id is already present
    async fn insert(&self, server: Server) -> Result<()>;

    /// Get a server by id
    async fn get(&self, id: &ServerId) -> Result<Option<Server>>;

    /// List all servers
    async fn list(&self) -> Result<Vec<Server>>;

    /// Persist changes to an existing server; fails if the id is unknown
    async fn save(&self, server: Server) -> Result<()>;
}
