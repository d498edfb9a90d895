//! Storage Gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                STORAGE GATEWAY               │
//!                      │                                              │
//!   GET /status ───────┼─▶ http server ──▶ Registry snapshot          │
//!                      │                                              │
//!   GET /data  ────────┼─▶ http server ──▶ Router                     │
//!                      │                    │ available() subset      │
//!                      │                    │ round-robin + failover  │
//!                      │                    ▼                         │
//!                      │                 UpstreamClient ──────────────┼──▶ storage_service_N/data
//!                      │                                              │
//!                      │   HealthMonitor (one loop per backend)       │
//!                      │     GET /status ─▶ classify ─▶ Registry ─────┼──▶ storage_service_N/status
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use storage_gateway::config::load_config;
use storage_gateway::lifecycle::{signals, startup, Shutdown};
use storage_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "storage-gateway")]
#[command(about = "Health-aware round-robin gateway for storage services", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding file and environment.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), |config| {
        if let Some(bind) = &args.bind {
            config.listener.bind_address = bind.clone();
        }
    })?;
    logging::init(&config.observability)?;

    tracing::info!("storage-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        interval_available_secs = config.health_check.interval_available_secs,
        interval_unavailable_secs = config.health_check.interval_unavailable_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
