//! In-memory storage implementations
//!
//! Suitable for development and testing. Production deployments should use
//! the PostgreSQL backend.

use crate::audit::AuditLog;
use crate::error::{RegistryError, Result};
use crate::store::ServerStore;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;
use vslm_types::{LifecycleEvent, Server, ServerId};

/// In-memory server store
pub struct InMemoryServerStore {
    servers: DashMap<ServerId, Server>,
}

impl InMemoryServerStore {
    pub fn new() -> Self {
        Self {
            servers: DashMap::new(),
        }
    }
}

impl Default for InMemoryServerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServerStore for InMemoryServerStore {
    async fn insert(&self, server: Server) -> Result<()> {
        let id = server.id.clone();

        if self.servers.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }

        self.servers.insert(id, server);
        Ok(())
    }

    async fn get(&self, id: &ServerId) -> Result<Option<Server>> {
        Ok(self.servers.get(id).map(|s| s.clone()))
    }

    async fn list(&self) -> Result<Vec<Server>> {
        Ok(self.servers.iter().map(|s| s.value().clone()).collect())
    }

    async fn save(&self, server: Server) -> Result<()> {
        if !self.servers.contains_key(&server.id) {
            return Err(RegistryError::NotFound(server.id.clone()));
        }
        self.servers.insert(server.id.clone(), server);
        Ok(())
    }
}

/// In-memory audit log
pub struct InMemoryAuditLog {
    events: RwLock<Vec<LifecycleEvent>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, event: LifecycleEvent) -> Result<()> {
        let mut events = self.events.write().await;
        events.push(event);

        // Keep only the last 10000 events in memory
        if events.len() > 10_000 {
            events.drain(0..1_000);
        }

        Ok(())
    }

    async fn events_for_server(&self, id: &ServerId, limit: usize) -> Result<Vec<LifecycleEvent>> {
        let events = self.events.read().await;
        let filtered: Vec<_> = events
            .iter()
            .filter(|e| &e.server_id == id)
            .cloned()
            .collect();

        let start = filtered.len().saturating_sub(limit);
        Ok(filtered[start..].to_vec())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<LifecycleEvent>> {
        let events = self.events.read().await;
        let start = events.len().saturating_sub(limit);
        Ok(events[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vslm_types::ServerStatus;

    fn test_server() -> Server {
        Server::new("us-east-1", "basic", ServerStatus::Running)
    }

    #[tokio::test]
    async fn test_server_crud() {
        let store = InMemoryServerStore::new();
        let server = test_server();
        let id = server.id.clone();

        // Create
        store.insert(server.clone()).await.unwrap();

        // Duplicate insert is rejected
        assert!(matches!(
            store.insert(server.clone()).await,
            Err(RegistryError::AlreadyExists(_))
        ));

        // Read
        let retrieved = store.get(&id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().region, "us-east-1");

        // List
        let servers = store.list().await.unwrap();
        assert_eq!(servers.len(), 1);

        // Update
        let mut updated = server.clone();
        updated.status = ServerStatus::Stopped;
        store.save(updated).await.unwrap();
        let retrieved = store.get(&id).await.unwrap().unwrap();
        assert_eq!(retrieved.status, ServerStatus::Stopped);
    }

    #[tokio::test]
    async fn test_save_unknown_server_fails() {
        let store = InMemoryServerStore::new();
        let server = test_server();

        assert!(matches!(
            store.save(server).await,
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_audit_log_append_and_query() {
        let log = InMemoryAuditLog::new();
        let server = test_server();
        let other = test_server();

        log.append(LifecycleEvent::created(server.id.clone(), server.status))
            .await
            .unwrap();
        log.append(LifecycleEvent::status_change(
            server.id.clone(),
            ServerStatus::Running,
            ServerStatus::Stopped,
        ))
        .await
        .unwrap();
        log.append(LifecycleEvent::created(other.id.clone(), other.status))
            .await
            .unwrap();

        let events = log.events_for_server(&server.id, 100).await.unwrap();
        assert_eq!(events.len(), 2);
        // Oldest first
        assert_eq!(events[0].new_status, Some(ServerStatus::Running));
        assert_eq!(events[1].new_status, Some(ServerStatus::Stopped));

        let recent = log.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].server_id, other.id);
    }

    #[tokio::test]
    async fn test_audit_log_limit() {
        let log = InMemoryAuditLog::new();
        let id = ServerId::generate();

        for _ in 0..5 {
            log.append(LifecycleEvent::created(id.clone(), ServerStatus::Running))
                .await
                .unwrap();
        }

        let events = log.events_for_server(&id, 3).await.unwrap();
        assert_eq!(events.len(), 3);
    }
}
