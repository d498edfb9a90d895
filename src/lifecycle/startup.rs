//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start the per-backend probe loops
//! - Serve traffic, then drain the probe loops on shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener is bound before probes start; traffic is served last
//! - Probe loops get `shutdown_grace_secs` to finish their iteration

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time;

use crate::config::validation::ValidationError;
use crate::config::GatewayConfig;
use crate::health::HealthMonitor;
use crate::http::{HttpServer, UpstreamClient};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::registry::Registry;
use crate::routing::Router;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid storage services: {0}")]
    Registry(#[from] ValidationError),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A fully wired gateway that has not started serving yet.
pub struct Gateway {
    config: GatewayConfig,
    registry: Arc<Registry>,
    router: Arc<Router>,
    client: UpstreamClient,
}

impl Gateway {
    /// Build the registry, downstream client and router from `config`.
    pub fn build(config: GatewayConfig) -> Result<Self, StartupError> {
        let registry = Arc::new(Registry::from_endpoints(&config.backends.storage_services)?);
        let client = UpstreamClient::new(config.timeouts.request());
        let router = Arc::new(Router::new(
            registry.clone(),
            client.clone(),
            config.retries.max_attempts,
        ));

        tracing::info!(
            backends = registry.len(),
            request_timeout = ?client.timeout(),
            max_attempts = config.retries.max_attempts,
            "Gateway initialized"
        );
        for backend in registry.backends() {
            tracing::info!(backend = %backend.name, url = %backend.base_url(), "Storage service configured");
        }

        Ok(Self {
            config,
            registry,
            router,
            client,
        })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Start probing, serve on `listener` until `shutdown` fires, then drain.
    pub async fn serve(self, listener: TcpListener, shutdown: Arc<Shutdown>) -> Result<(), StartupError> {
        let monitor = HealthMonitor::new(
            self.registry.clone(),
            &self.config.health_check,
            self.client.clone(),
        )
        .start(&shutdown);

        let server = HttpServer::new(self.router.clone(), &self.config.listener);
        let served = server.run(listener, shutdown.subscribe()).await;

        // The server may also stop on an I/O error.
        shutdown.trigger();

        let grace = Duration::from_secs(self.config.listener.shutdown_grace_secs);
        let abort = monitor.abort_handles();
        if time::timeout(grace, monitor.join()).await.is_err() {
            tracing::warn!(grace = ?grace, "Probe loops still running after grace period, aborting");
            for handle in abort {
                handle.abort();
            }
        }

        served.map_err(StartupError::Serve)
    }
}

/// Run the gateway described by `config` until `shutdown` fires.
pub async fn run(config: GatewayConfig, shutdown: Arc<Shutdown>) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let gateway = Gateway::build(config)?;

    let bind_address = gateway.config.listener.bind_address.clone();
    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            addr: bind_address.clone(),
            source,
        })?;
    tracing::info!(address = %bind_address, "Listening for connections");

    gateway.serve(listener, shutdown).await
}
