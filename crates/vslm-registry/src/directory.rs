//! Server directory: creation policy and lookup over an injected store
//!
//! The directory owns what it means to create a server (id assignment,
//! billing rate, initial status, timestamps) and delegates durability to
//! the [`ServerStore`] it was constructed with.

use crate::error::Result;
use crate::store::ServerStore;
use std::sync::Arc;
use vslm_types::{Server, ServerId, ServerStatus};

/// Request to create a server
#[derive(Debug, Clone)]
pub struct NewServer {
    pub region: String,
    pub kind: String,
}

/// Canonical set of server records, backed by an injected store
#[derive(Clone)]
pub struct ServerDirectory {
    store: Arc<dyn ServerStore>,
    initial_status: ServerStatus,
}

impl ServerDirectory {
    /// Create a directory over the given store. `initial_status` is the
    /// status every newly created server starts in.
    pub fn new(store: Arc<dyn ServerStore>, initial_status: ServerStatus) -> Self {
        Self {
            store,
            initial_status,
        }
    }

    /// Create and persist a new server record
    pub async fn create(&self, request: NewServer) -> Result<Server> {
        let server = Server::new(request.region, request.kind, self.initial_status);
        self.store.insert(server.clone()).await?;
        Ok(server)
    }

    /// Look up a server by id
    pub async fn get(&self, id: &ServerId) -> Result<Option<Server>> {
        self.store.get(id).await
    }

    /// List all servers
    pub async fn list(&self) -> Result<Vec<Server>> {
        self.store.list().await
    }

    /// Persist a changed server record
    pub async fn save(&self, server: Server) -> Result<()> {
        self.store.save(server).await
    }
}
