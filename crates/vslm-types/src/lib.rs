//! VSLM Types - Core types for virtual server lifecycle management
//!
//! VSLM (Virtual Server Lifecycle Manager) tracks server records through a
//! fixed lifecycle and keeps an append-only audit trail of every processed
//! action.
//!
//! ## Key Concepts
//!
//! - **Server**: A lifecycle-tracked record representing one managed unit
//! - **ServerStatus**: The fixed state set (pending, running, stopped, terminated)
//! - **ServerAction**: Requested state changes (start, stop, reboot, terminate)
//! - **LifecycleEvent**: Append-only audit record of an applied or denied action

#![deny(unsafe_code)]

pub mod events;
pub mod ids;
pub mod server;

// Re-export main types
pub use events::{EventSeverity, EventType, LifecycleEvent};
pub use ids::{EventId, ServerId};
pub use server::{Server, ServerAction, ServerStatus, UnknownAction, UnknownStatus};
