//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): client requests by route, status
//! - `gateway_request_duration_seconds` (histogram): client request latency
//! - `gateway_dispatch_attempts_total` (counter): data attempts by backend, outcome
//! - `gateway_dispatch_duration_seconds` (histogram): per-attempt latency by backend
//! - `gateway_health_probes_total` (counter): probes by backend, result
//! - `gateway_backend_available` (gauge): 1=available, 0=unavailable
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("gateway_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route).record(start.elapsed().as_secs_f64());
}

pub fn record_dispatch(backend: &str, outcome: &'static str, start: Instant) {
    counter!(
        "gateway_dispatch_attempts_total",
        "backend" => backend.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_dispatch_duration_seconds", "backend" => backend.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// `failure` is `None` for a healthy probe, else the failure kind.
pub fn record_probe(backend: &str, failure: Option<&'static str>) {
    counter!(
        "gateway_health_probes_total",
        "backend" => backend.to_string(),
        "result" => failure.unwrap_or("ok")
    )
    .increment(1);
}

pub fn record_backend_health(backend: &str, available: bool) {
    gauge!("gateway_backend_available", "backend" => backend.to_string())
        .set(if available { 1.0 } else { 0.0 });
}
