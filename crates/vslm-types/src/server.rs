//! Server record and lifecycle vocabulary
//!
//! A Server is a data record with a status field, not an actual virtual
//! machine. Descriptive attributes are fixed at creation; only `status` and
//! `updated_at` change afterwards, and only through lifecycle decisions.

use crate::ServerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Server lifecycle status
///
/// `Terminated` is absorbing: no action moves a server out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Server is being provisioned
    Pending,
    /// Server is running
    Running,
    /// Server is stopped
    Stopped,
    /// Server has been terminated (terminal)
    Terminated,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Terminated => "terminated",
        }
    }

    /// Whether the status has no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for status strings outside the fixed state set
#[derive(Debug, Clone, Error)]
#[error("Unknown server status '{0}'.")]
pub struct UnknownStatus(pub String);

impl FromStr for ServerStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            "terminated" => Ok(Self::Terminated),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Actions that can be requested against a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerAction {
    Start,
    Stop,
    Reboot,
    Terminate,
}

impl ServerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reboot => "reboot",
            Self::Terminate => "terminate",
        }
    }
}

impl fmt::Display for ServerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for action names outside the supported set
#[derive(Debug, Clone, Error)]
#[error("Action '{0}' is not supported.")]
pub struct UnknownAction(pub String);

impl FromStr for ServerAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "reboot" => Ok(Self::Reboot),
            "terminate" => Ok(Self::Terminate),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// A lifecycle-managed virtual server record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Unique server identifier, assigned at creation
    pub id: ServerId,

    /// Current lifecycle status
    pub status: ServerStatus,

    /// Hourly billing rate, derived from the server type at creation
    pub billing_rate: f64,

    /// Region the server was requested in
    pub region: String,

    /// Server type ("basic", "plus", "prime")
    #[serde(rename = "type")]
    pub kind: String,

    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Changes exactly when `status` changes
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Server {
    /// Create a new server record with a generated ID and fresh timestamps
    pub fn new(region: impl Into<String>, kind: impl Into<String>, status: ServerStatus) -> Self {
        let kind = kind.into();
        let now = chrono::Utc::now();
        Self {
            id: ServerId::generate(),
            status,
            billing_rate: Self::billing_rate_for(&kind),
            region: region.into(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Hourly billing rate for a server type; unrecognized types bill at 0.0
    pub fn billing_rate_for(kind: &str) -> f64 {
        match kind {
            "basic" => 5.0,
            "plus" => 8.0,
            "prime" => 12.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ServerStatus::Pending,
            ServerStatus::Running,
            ServerStatus::Stopped,
            ServerStatus::Terminated,
        ] {
            assert_eq!(status.as_str().parse::<ServerStatus>().unwrap(), status);
        }
        assert!("rebooting".parse::<ServerStatus>().is_err());
    }

    #[test]
    fn test_terminated_is_terminal() {
        assert!(ServerStatus::Terminated.is_terminal());
        assert!(!ServerStatus::Running.is_terminal());
        assert!(!ServerStatus::Pending.is_terminal());
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("reboot".parse::<ServerAction>().unwrap(), ServerAction::Reboot);
        let err = "explode".parse::<ServerAction>().unwrap_err();
        assert_eq!(err.to_string(), "Action 'explode' is not supported.");
    }

    #[test]
    fn test_billing_rates() {
        assert_eq!(Server::billing_rate_for("basic"), 5.0);
        assert_eq!(Server::billing_rate_for("plus"), 8.0);
        assert_eq!(Server::billing_rate_for("prime"), 12.0);
        assert_eq!(Server::billing_rate_for("quantum"), 0.0);
    }

    #[test]
    fn test_new_server() {
        let server = Server::new("us-east-1", "prime", ServerStatus::Running);
        assert_eq!(server.status, ServerStatus::Running);
        assert_eq!(server.billing_rate, 12.0);
        assert_eq!(server.created_at, server.updated_at);
    }

    #[test]
    fn test_server_kind_serializes_as_type() {
        let server = Server::new("eu-west-1", "basic", ServerStatus::Running);
        let json = serde_json::to_value(&server).unwrap();
        assert_eq!(json["type"], "basic");
        assert_eq!(json["status"], "running");
    }
}
