//! VSLM Lifecycle - Pure decision engine for server status transitions
//!
//! `decide` maps (requested action, current status) to a [`Decision`] and
//! does nothing else: no I/O, no clock, no errors. Callers apply the
//! decision; this crate only rules on legality. The transition table is
//! encoded as an explicit match, one arm per cell.

#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use vslm_types::{ServerAction, ServerStatus};

/// Outcome of a lifecycle ruling
///
/// Denial and no-op both leave the status untouched but are distinct:
/// a denial is a conflict, a no-op is a success without a state delta.
/// Both still get audited by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// The action is legal and moves the server to a new status
    Transitioned {
        from: ServerStatus,
        to: ServerStatus,
    },

    /// The action is acknowledged but the status stays as it is
    /// (currently only `reboot` on a running server)
    NoChange { status: ServerStatus },

    /// The action is not allowed from the current status
    Denied { reason: String },
}

impl Decision {
    fn transition(from: ServerStatus, to: ServerStatus) -> Self {
        Self::Transitioned { from, to }
    }

    fn denied(reason: &str) -> Self {
        Self::Denied {
            reason: reason.to_string(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Rule on an action requested against a server in the given status.
pub fn decide(action: ServerAction, current: ServerStatus) -> Decision {
    use ServerAction::*;
    use ServerStatus::*;

    match action {
        Start => match current {
            Stopped => Decision::transition(Stopped, Running),
            Running => Decision::denied("Server is already running."),
            Terminated => Decision::denied("Cannot start a terminated server."),
            Pending => Decision::denied("Server is in pending state and cannot be started."),
        },

        Stop => match current {
            Running => Decision::transition(Running, Stopped),
            Stopped => Decision::denied("Server is already stopped."),
            Terminated => Decision::denied("Cannot stop a terminated server."),
            Pending => Decision::denied("Server is in pending state and cannot be stopped."),
        },

        // Reboot is a transient signal: a running server stays running.
        Reboot => match current {
            Running => Decision::NoChange { status: Running },
            Stopped => Decision::denied("Cannot reboot a stopped server. Start it first."),
            Terminated => Decision::denied("Cannot reboot a terminated server."),
            Pending => Decision::denied("Server is in pending state and cannot be rebooted."),
        },

        Terminate => match current {
            Pending | Running | Stopped => Decision::transition(current, Terminated),
            Terminated => Decision::denied("Server is already terminated."),
        },
    }
}
