//! VSLM Daemon - Virtual server lifecycle service
//!
//! The VSLM daemon provides:
//! - REST API for creating, inspecting, and acting on servers
//! - Lifecycle rule enforcement with per-server action serialization
//! - Append-only audit trail of every processed action
//! - Event streaming for observability

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vslm_daemon::{DaemonConfig, DaemonError, DaemonResult, Server};

/// VSLM Daemon CLI
#[derive(Parser)]
#[command(name = "vslmd")]
#[command(about = "VSLM Daemon - Virtual server lifecycle service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "VSLM_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(
        short,
        long,
        env = "VSLM_LISTEN_ADDR",
        default_value = "127.0.0.1:8080"
    )]
    listen: String,

    /// Log level
    #[arg(long, env = "VSLM_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "VSLM_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    config.server.listen_addr = cli
        .listen
        .parse()
        .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;

    // Print startup banner
    println!(
        r#"
 __     __ ____  _     __  __
 \ \   / // ___|| |   |  \/  |
  \ \ / / \___ \| |   | |\/| |
   \ V /   ___) | |___| |  | |
    \_/   |____/|_____|_|  |_|

  Virtual Server Lifecycle Manager
  Version: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr
    );

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await
}
