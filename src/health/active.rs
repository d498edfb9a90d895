//! Active health checking.
//!
//! # Responsibilities
//! - Run one independent probe loop per configured backend
//! - Write each classification to the registry
//! - Pick the next delay from the backend's current status
//!
//! # Design Decisions
//! - A loop only ends on the shutdown signal, never on a probe failure
//! - The signal is checked at the top of each iteration, so an in-flight
//!   probe and the sleep after it always complete first

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::probe::ProbeExpectation;
use crate::http::client::UpstreamClient;
use crate::lifecycle::shutdown::{stop_requested, Shutdown};
use crate::observability::metrics;
use crate::registry::{Backend, HealthStatus, Registry};

pub struct HealthMonitor {
    registry: Arc<Registry>,
    client: UpstreamClient,
    expectation: ProbeExpectation,
    interval_available: Duration,
    interval_unavailable: Duration,
}

impl HealthMonitor {
    pub fn new(registry: Arc<Registry>, config: &HealthCheckConfig, client: UpstreamClient) -> Self {
        Self {
            registry,
            client,
            expectation: ProbeExpectation::from(config),
            interval_available: config.interval_available(),
            interval_unavailable: config.interval_unavailable(),
        }
    }

    /// Override the poll intervals (sub-second cadences in tests).
    pub fn with_intervals(mut self, available: Duration, unavailable: Duration) -> Self {
        self.interval_available = available;
        self.interval_unavailable = unavailable;
        self
    }

    /// Spawn one probe loop per backend.
    ///
    /// Every loop subscribes to `shutdown` before this returns.
    pub fn start(self, shutdown: &Shutdown) -> MonitorHandle {
        tracing::info!(
            backends = self.registry.len(),
            path = %self.expectation.path,
            interval_available = ?self.interval_available,
            interval_unavailable = ?self.interval_unavailable,
            "Health monitor starting"
        );

        let monitor = Arc::new(self);
        let tasks = monitor
            .registry
            .backends()
            .iter()
            .map(|backend| {
                let stop = shutdown.subscribe();
                let task = tokio::spawn(monitor.clone().watch(backend.clone(), stop));
                (backend.name.clone(), task)
            })
            .collect();

        MonitorHandle { tasks }
    }

    async fn watch(self: Arc<Self>, backend: Arc<Backend>, stop: watch::Receiver<bool>) {
        tracing::debug!(backend = %backend.name, url = %backend.base_url(), "Probe loop started");

        while !stop_requested(&stop) {
            self.probe(&backend).await;
            time::sleep(self.next_delay(&backend.name)).await;
        }

        tracing::debug!(backend = %backend.name, "Probe loop stopped");
    }

    /// Probe one backend once and record the result.
    pub async fn probe(&self, backend: &Backend) -> HealthStatus {
        let url = backend.url_for(&self.expectation.path);
        let (status, failure) = self.expectation.classify(self.client.get(&url).await);

        match &failure {
            Some(failure) => {
                tracing::debug!(backend = %backend.name, url = %url, reason = %failure, "Health probe failed");
            }
            None => tracing::trace!(backend = %backend.name, "Health probe ok"),
        }
        metrics::record_probe(&backend.name, failure.as_ref().map(|f| f.kind()));

        let previous = self.registry.set_status(&backend.name, status);
        if previous.is_some_and(|p| p != status) {
            if status.is_available() {
                tracing::info!(backend = %backend.name, url = %backend.base_url(), "Backend became available");
            } else {
                tracing::warn!(backend = %backend.name, url = %backend.base_url(), "Backend became unavailable");
            }
        }
        metrics::record_backend_health(&backend.name, status.is_available());

        status
    }

    /// Delay before the next probe of `name`, read back from the registry.
    pub fn next_delay(&self, name: &str) -> Duration {
        match self.registry.status(name) {
            HealthStatus::Available => self.interval_available,
            HealthStatus::Unavailable => self.interval_unavailable,
        }
    }
}

/// Join handles of the running probe loops.
#[derive(Debug)]
pub struct MonitorHandle {
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl MonitorHandle {
    /// Number of probe loops started.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// True once every loop has returned.
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|(_, t)| t.is_finished())
    }

    /// Wait for every loop to observe the shutdown signal and return.
    pub async fn join(self) {
        for (name, task) in self.tasks {
            if let Err(e) = task.await {
                tracing::error!(backend = %name, error = %e, "Probe loop ended abnormally");
            }
        }
    }

    /// Handles that cancel the loops, usable after `join` took ownership.
    pub fn abort_handles(&self) -> Vec<AbortHandle> {
        self.tasks.iter().map(|(_, t)| t.abort_handle()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(raw: &str) -> HealthMonitor {
        let registry = Arc::new(Registry::from_endpoints(raw).unwrap());
        HealthMonitor::new(
            registry,
            &HealthCheckConfig::default(),
            UpstreamClient::new(Duration::from_millis(200)),
        )
    }

    #[test]
    fn delay_follows_registry_status() {
        let m = monitor("http://service1");
        assert_eq!(m.next_delay("storage_service_1"), Duration::from_secs(5));

        m.registry.set_status("storage_service_1", HealthStatus::Available);
        assert_eq!(m.next_delay("storage_service_1"), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn loops_started_after_trigger_exit_without_probing() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let m = monitor("http://service1,http://service2");
        let registry = m.registry.clone();
        let handle = m.start(&shutdown);
        assert_eq!(handle.len(), 2);

        time::timeout(Duration::from_secs(1), handle.join())
            .await
            .expect("loops should observe the earlier trigger");
        assert_eq!(registry.status("storage_service_1"), HealthStatus::Unavailable);
    }

    #[tokio::test]
    async fn no_backends_starts_no_loops() {
        let shutdown = Shutdown::new();
        let handle = monitor("").start(&shutdown);
        assert!(handle.is_empty());
        handle.join().await;
    }
}
