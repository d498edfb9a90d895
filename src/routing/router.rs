//! Data request routing.
//!
//! # Responsibilities
//! - Build the candidate set from the registry's available backends
//! - Dispatch `GET /data` by round-robin with bounded failover
//! - Serve the health snapshot for `GET /status`
//!
//! # Design Decisions
//! - Candidates are read once per request; later health changes are not
//!   seen until the next request
//! - A rejected data request never changes a backend's monitored health
//! - The cursor advances on every attempt, successful or not

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;

use crate::error::GatewayError;
use crate::http::client::{UpstreamClient, UpstreamResponse};
use crate::observability::metrics;
use crate::registry::{Registry, StatusSnapshot};
use crate::routing::failover::{AttemptOutcome, FailoverPlan};
use crate::routing::round_robin::RoundRobin;

/// Path requested on a backend for every data request.
pub const DATA_PATH: &str = "/data";

#[derive(Debug)]
pub struct Router {
    registry: Arc<Registry>,
    client: UpstreamClient,
    cursor: RoundRobin,
    max_attempts: u32,
}

impl Router {
    pub fn new(registry: Arc<Registry>, client: UpstreamClient, max_attempts: u32) -> Self {
        Self {
            registry,
            client,
            cursor: RoundRobin::new(),
            max_attempts,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Current round-robin position.
    pub fn cursor(&self) -> usize {
        self.cursor.position()
    }

    /// Fetch data from one available backend.
    pub async fn get_data(&self) -> Result<UpstreamResponse, GatewayError> {
        let candidates = self.registry.available();
        if candidates.is_empty() {
            tracing::debug!("No available storage services");
            return Err(GatewayError::ServiceUnavailable);
        }
        tracing::debug!(
            candidates = ?candidates.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
            "Dispatching data request"
        );

        let mut plan = FailoverPlan::new(candidates, self.max_attempts);
        while !plan.is_exhausted() {
            let position = self.cursor.advance();
            let Some((index, backend)) = plan.select(position) else {
                break;
            };
            let backend = backend.clone();
            let url = backend.url_for(DATA_PATH);
            let start = Instant::now();

            tracing::debug!(backend = %backend.name, url = %url, attempt = plan.attempts() + 1, "Attempting backend");
            let outcome = match self.client.get(&url).await {
                Ok(response) if response.status == StatusCode::OK => {
                    metrics::record_dispatch(&backend.name, AttemptOutcome::Success.as_str(), start);
                    tracing::debug!(backend = %backend.name, "Data retrieved");
                    return Ok(response);
                }
                Ok(response) => {
                    tracing::debug!(backend = %backend.name, status = %response.status, "Backend rejected data request");
                    AttemptOutcome::Rejected
                }
                Err(e) => {
                    tracing::debug!(backend = %backend.name, error = %e, "Data request failed");
                    AttemptOutcome::Unreachable
                }
            };
            metrics::record_dispatch(&backend.name, outcome.as_str(), start);
            plan.record(index, outcome);
        }

        tracing::debug!(attempts = plan.attempts(), "All storage services unavailable");
        Err(GatewayError::ServiceUnavailable)
    }

    /// Health snapshot of every configured backend.
    pub fn get_status(&self) -> StatusSnapshot {
        self.registry.snapshot()
    }
}
