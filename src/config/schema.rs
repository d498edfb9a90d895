//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the storage gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, inbound limits).
    pub listener: ListenerConfig,

    /// Storage service endpoints.
    pub backends: BackendsConfig,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Downstream timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Upper bound on handling one inbound request, in seconds.
    pub request_timeout_secs: u64,

    /// How long shutdown waits for probe loops to finish, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Storage service endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BackendsConfig {
    /// Comma-separated base URLs, e.g. "http://s1:5000,http://s2:5000".
    pub storage_services: String,
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Delay after a probe that left the backend available, in seconds.
    pub interval_available_secs: u64,

    /// Delay after a probe that left the backend unavailable, in seconds.
    pub interval_unavailable_secs: u64,

    /// Path to probe on every backend.
    pub path: String,

    /// JSON field of the probe body holding the service state.
    pub state_field: String,

    /// Value of `state_field` that means healthy.
    pub ok_value: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_available_secs: 1,
            interval_unavailable_secs: 5,
            path: "/status".to_string(),
            state_field: "state".to_string(),
            ok_value: "OK".to_string(),
        }
    }
}

impl HealthCheckConfig {
    pub fn interval_available(&self) -> Duration {
        Duration::from_secs(self.interval_available_secs)
    }

    pub fn interval_unavailable(&self) -> Duration {
        Duration::from_secs(self.interval_unavailable_secs)
    }
}

/// Timeouts for calls made to storage services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time for one downstream request (probe or data), in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 3 }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of dispatch attempts per data request.
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
