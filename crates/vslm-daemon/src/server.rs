//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::{DaemonConfig, StorageConfig};
use crate::error::DaemonResult;
use std::sync::Arc;
use tokio::net::TcpListener;
use vslm_control::ControlPlane;
use vslm_registry::{
    AuditLog, InMemoryAuditLog, InMemoryServerStore, PostgresStore, ServerDirectory, ServerStore,
};

/// VSLM Daemon Server
pub struct Server {
    config: DaemonConfig,
    control: Arc<ControlPlane>,
}

impl Server {
    /// Create a new server with the given configuration
    pub async fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let (store, audit): (Arc<dyn ServerStore>, Arc<dyn AuditLog>) = match &config.storage {
            StorageConfig::Memory => (
                Arc::new(InMemoryServerStore::new()),
                Arc::new(InMemoryAuditLog::new()),
            ),
            StorageConfig::Postgres {
                timezone,
                max_connections,
                connect_timeout_secs,
                ..
            } => {
                let url = config
                    .storage
                    .connection_url()
                    .expect("postgres storage always has a connection url");
                let store = Arc::new(
                    PostgresStore::connect(&url, timezone, *max_connections, *connect_timeout_secs)
                        .await?,
                );
                (store.clone(), store)
            }
        };

        let directory = ServerDirectory::new(store, config.lifecycle.initial_status);
        let control = Arc::new(ControlPlane::new(directory, audit));

        Ok(Self { config, control })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.control.clone());
        let app = create_router(state);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("VSLM daemon listening on {}", addr);
        tracing::info!(
            "Initial server status: {}",
            self.config.lifecycle.initial_status
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::error::DaemonError::Server(e.to_string()))?;

        tracing::info!("VSLM daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
