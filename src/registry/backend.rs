//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single configured storage service
//! - Derive the stable identity from the configuration position
//! - Build downstream URLs for the health and data endpoints

use serde::{Deserialize, Serialize};
use url::Url;

/// Prefix of every backend identity; the suffix is the 1-based config index.
pub const IDENTITY_PREFIX: &str = "storage_service_";

/// Binary health classification maintained by the health monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Available,
    Unavailable,
}

impl HealthStatus {
    /// Label used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Available => "available",
            HealthStatus::Unavailable => "unavailable",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Available)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single configured storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// Stable identity, e.g. `storage_service_1`.
    pub name: String,
    /// Base URL as configured.
    pub endpoint: Url,
}

impl Backend {
    /// Create the backend found at `index` (0-based) in the configured list.
    pub fn new(index: usize, endpoint: Url) -> Self {
        Self {
            name: identity_for(index),
            endpoint,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.as_str().trim_end_matches('/')
    }

    /// Absolute URL of `path` on this backend. `path` must start with `/`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

/// Identity of the backend at a 0-based configuration index.
pub fn identity_for(index: usize) -> String {
    format!("{}{}", IDENTITY_PREFIX, index + 1)
}
