//! VSLM Daemon library
//!
//! This module provides the core components for the VSLM daemon:
//! - REST API handlers
//! - Storage selection and configuration
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use api::{create_router, AppState};
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, DaemonResult};
pub use server::Server;
