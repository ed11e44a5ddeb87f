//! Audit trail trait
//!
//! The trail is append-only: events are written once and never updated or
//! deleted. Per-server ordering follows append order.

use crate::error::Result;
use async_trait::async_trait;
use vslm_types::{LifecycleEvent, ServerId};

/// Append-only log of lifecycle events
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append an event
    async fn append(&self, event: LifecycleEvent) -> Result<()>;

    /// Events for one server, oldest first, capped to the `limit` most recent
    async fn events_for_server(&self, id: &ServerId, limit: usize) -> Result<Vec<LifecycleEvent>>;

    /// Most recent events across all servers, oldest first
    async fn recent(&self, limit: usize) -> Result<Vec<LifecycleEvent>>;
}
