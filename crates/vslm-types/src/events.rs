//! Lifecycle event types for the audit trail
//!
//! Events are append-only: written once per processed action (or creation)
//! and never updated or deleted. An event outlives the server it concerns.

use crate::{EventId, ServerAction, ServerId, ServerStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// Server record created
    #[serde(rename = "SERVER_CREATED")]
    Created,

    /// Status transition applied
    #[serde(rename = "STATUS_CHANGE")]
    StatusChange,

    /// Action rejected by the lifecycle rules
    #[serde(rename = "ACTION_DENIED")]
    ActionDenied,

    /// Action acknowledged without a state delta
    #[serde(rename = "ACTION_NO_CHANGE")]
    ActionNoOp,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "SERVER_CREATED",
            Self::StatusChange => "STATUS_CHANGE",
            Self::ActionDenied => "ACTION_DENIED",
            Self::ActionNoOp => "ACTION_NO_CHANGE",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVER_CREATED" => Ok(Self::Created),
            "STATUS_CHANGE" => Ok(Self::StatusChange),
            "ACTION_DENIED" => Ok(Self::ActionDenied),
            "ACTION_NO_CHANGE" => Ok(Self::ActionNoOp),
            other => Err(format!("Unknown event type '{}'.", other)),
        }
    }
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    /// Informational event
    Info,
    /// Warning event
    Warning,
    /// Error event
    Error,
}

impl EventSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for EventSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("Unknown severity '{}'.", other)),
        }
    }
}

/// One audit record
///
/// `old_status` and `new_status` are explicit optionals: creation events
/// have no prior status, and denial events have no resulting one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Unique event ID
    pub id: EventId,

    /// Server this event concerns (weak reference)
    pub server_id: ServerId,

    /// Kind of record
    pub event_type: EventType,

    /// Human-readable description
    pub message: String,

    /// Status before the action, if any
    pub old_status: Option<ServerStatus>,

    /// Status after the action, if it changed anything
    pub new_status: Option<ServerStatus>,

    /// Event severity
    pub severity: EventSeverity,

    /// Timestamp, set at write time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl LifecycleEvent {
    fn new(
        server_id: ServerId,
        event_type: EventType,
        message: String,
        old_status: Option<ServerStatus>,
        new_status: Option<ServerStatus>,
    ) -> Self {
        Self {
            id: EventId::generate(),
            server_id,
            event_type,
            message,
            old_status,
            new_status,
            severity: Self::infer_severity(event_type),
            created_at: chrono::Utc::now(),
        }
    }

    /// Record that a server was created
    pub fn created(server_id: ServerId, status: ServerStatus) -> Self {
        Self::new(
            server_id,
            EventType::Created,
            "New server created.".to_string(),
            None,
            Some(status),
        )
    }

    /// Record an applied status transition
    pub fn status_change(server_id: ServerId, from: ServerStatus, to: ServerStatus) -> Self {
        Self::new(
            server_id,
            EventType::StatusChange,
            format!("Status changed to '{}'.", to),
            Some(from),
            Some(to),
        )
    }

    /// Record a denied action
    pub fn action_denied(server_id: ServerId, current: ServerStatus, reason: &str) -> Self {
        Self::new(
            server_id,
            EventType::ActionDenied,
            reason.to_string(),
            Some(current),
            None,
        )
    }

    /// Record an action that completed without a state delta
    pub fn action_no_change(
        server_id: ServerId,
        action: ServerAction,
        status: ServerStatus,
    ) -> Self {
        Self::new(
            server_id,
            EventType::ActionNoOp,
            format!("Action '{}' processed, status remains '{}'.", action, status),
            Some(status),
            None,
        )
    }

    /// Infer severity from the event type
    fn infer_severity(event_type: EventType) -> EventSeverity {
        match event_type {
            EventType::ActionDenied => EventSeverity::Warning,
            _ => EventSeverity::Info,
        }
    }
}
