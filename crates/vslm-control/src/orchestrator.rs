//! Control plane implementation
//!
//! One `apply_action` call is one complete unit of work: load, rule, apply,
//! audit. A per-server lock table guarantees at most one in-flight action
//! per server id while actions on different servers run concurrently.

use crate::error::{ActionError, Result};
use crate::events::EventBroadcaster;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, instrument, warn};
use vslm_lifecycle::{decide, Decision};
use vslm_registry::{AuditLog, NewServer, ServerDirectory};
use vslm_types::{LifecycleEvent, Server, ServerAction, ServerId, ServerStatus};

/// Successful result of applying an action
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Status transition was applied and persisted
    Completed {
        server: Server,
        from: ServerStatus,
        to: ServerStatus,
    },

    /// Action acknowledged, status unchanged
    NoChange { server: Server },
}

impl ActionOutcome {
    /// Snapshot of the server after the action
    pub fn server(&self) -> &Server {
        match self {
            Self::Completed { server, .. } => server,
            Self::NoChange { server } => server,
        }
    }
}

/// Unified entry point for server lifecycle operations
pub struct ControlPlane {
    directory: ServerDirectory,
    audit: Arc<dyn AuditLog>,
    events: EventBroadcaster,

    // One mutex per server id; entries live as long as the process. Locks
    // for distinct servers never contend.
    action_locks: DashMap<ServerId, Arc<Mutex<()>>>,
}

impl ControlPlane {
    /// Create a control plane over the given directory and audit log
    pub fn new(directory: ServerDirectory, audit: Arc<dyn AuditLog>) -> Self {
        Self {
            directory,
            audit,
            events: EventBroadcaster::new(),
            action_locks: DashMap::new(),
        }
    }

    /// Create a new server and audit the creation
    #[instrument(skip(self, request), fields(kind = %request.kind, region = %request.region))]
    pub async fn create_server(&self, request: NewServer) -> Result<Server> {
        let server = self.directory.create(request).await?;

        self.record(LifecycleEvent::created(server.id.clone(), server.status))
            .await;

        info!(server_id = %server.id, status = %server.status, "Server created");

        Ok(server)
    }

    /// Get a server by id
    pub async fn get_server(&self, id: &ServerId) -> Result<Server> {
        self.directory
            .get(id)
            .await?
            .ok_or_else(|| ActionError::NotFound(id.clone()))
    }

    /// List all servers
    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        Ok(self.directory.list().await?)
    }

    /// Audit events for a server, oldest first
    pub async fn events_for_server(
        &self,
        id: &ServerId,
        limit: usize,
    ) -> Result<Vec<LifecycleEvent>> {
        // Confirm the server exists so unknown ids surface as NotFound
        // rather than an empty list.
        self.get_server(id).await?;
        Ok(self.audit.events_for_server(id, limit).await?)
    }

    /// Subscribe to the live event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Apply a lifecycle action to a server
    #[instrument(skip(self), fields(server_id = %id, action = %action))]
    pub async fn apply_action(&self, id: &ServerId, action: ServerAction) -> Result<ActionOutcome> {
        self.apply_action_inner(id, action, None).await
    }

    /// Apply a lifecycle action, honoring a caller-supplied deadline.
    ///
    /// The deadline is checked before the persistence write: an expired
    /// deadline reports `DeadlineExceeded` without writing. Once the write
    /// has been issued the action always runs to completion.
    #[instrument(skip(self, deadline), fields(server_id = %id, action = %action))]
    pub async fn apply_action_with_deadline(
        &self,
        id: &ServerId,
        action: ServerAction,
        deadline: Instant,
    ) -> Result<ActionOutcome> {
        self.apply_action_inner(id, action, Some(deadline)).await
    }

    async fn apply_action_inner(
        &self,
        id: &ServerId,
        action: ServerAction,
        deadline: Option<Instant>,
    ) -> Result<ActionOutcome> {
        let lock = self.action_lock(id);
        let _guard = lock.lock().await;

        let server = self
            .directory
            .get(id)
            .await?
            .ok_or_else(|| ActionError::NotFound(id.clone()))?;

        match decide(action, server.status) {
            Decision::Denied { reason } => {
                self.record(LifecycleEvent::action_denied(
                    id.clone(),
                    server.status,
                    &reason,
                ))
                .await;

                warn!(
                    server_id = %id,
                    status = %server.status,
                    %action,
                    %reason,
                    "Action denied"
                );

                Err(ActionError::Denied { reason })
            }

            Decision::NoChange { status } => {
                self.record(LifecycleEvent::action_no_change(id.clone(), action, status))
                    .await;

                info!(server_id = %id, status = %status, %action, "Action completed without state change");

                Ok(ActionOutcome::NoChange { server })
            }

            Decision::Transitioned { from, to } => {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return Err(ActionError::DeadlineExceeded);
                }

                let mut updated = server;
                updated.status = to;
                updated.updated_at = chrono::Utc::now();

                self.directory.save(updated.clone()).await?;

                self.record(LifecycleEvent::status_change(id.clone(), from, to))
                    .await;

                info!(server_id = %id, %from, %to, %action, "Server status changed");

                Ok(ActionOutcome::Completed {
                    server: updated,
                    from,
                    to,
                })
            }
        }
    }

    /// Append to the audit trail and broadcast.
    ///
    /// The append is best-effort: a failed audit write never changes the
    /// outcome of the action it describes, it is only surfaced here.
    async fn record(&self, event: LifecycleEvent) {
        if let Err(e) = self.audit.append(event.clone()).await {
            warn!(
                server_id = %event.server_id,
                event_type = %event.event_type,
                error = %e,
                "Failed to append audit event"
            );
        }
        self.events.emit(event);
    }

    fn action_lock(&self, id: &ServerId) -> Arc<Mutex<()>> {
        self.action_locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
