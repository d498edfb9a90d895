//! Health probe classification.
//!
//! # Responsibilities
//! - Turn one probe response (or failure) into a `HealthStatus`
//! - Describe why a probe failed, for logs and metrics
//!
//! # Design Decisions
//! - Only HTTP 200 with the expected state value counts as healthy
//! - Field name and healthy value are configuration, not constants

use axum::http::StatusCode;
use serde_json::Value;

use crate::config::HealthCheckConfig;
use crate::http::client::{UpstreamError, UpstreamResponse};
use crate::registry::HealthStatus;

/// Why a backend was classified unavailable.
#[derive(Debug, thiserror::Error)]
pub enum ProbeFailure {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("unexpected status {0}")]
    BadStatus(StatusCode),

    #[error("body is not JSON: {0}")]
    NotJson(String),

    #[error("field '{field}' is {found}, expected \"{expected}\"")]
    BadState {
        field: String,
        found: String,
        expected: String,
    },
}

impl ProbeFailure {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeFailure::Upstream(UpstreamError::Timeout { .. }) => "timeout",
            ProbeFailure::Upstream(_) => "transport",
            ProbeFailure::BadStatus(_) => "bad_status",
            ProbeFailure::NotJson(_) | ProbeFailure::BadState { .. } => "bad_body",
        }
    }
}

/// What a probe response must look like to count as healthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeExpectation {
    pub path: String,
    pub state_field: String,
    pub ok_value: String,
}

impl From<&HealthCheckConfig> for ProbeExpectation {
    fn from(config: &HealthCheckConfig) -> Self {
        Self {
            path: config.path.clone(),
            state_field: config.state_field.clone(),
            ok_value: config.ok_value.clone(),
        }
    }
}

impl Default for ProbeExpectation {
    fn default() -> Self {
        Self::from(&HealthCheckConfig::default())
    }
}

impl ProbeExpectation {
    /// Check a probe response against this expectation.
    pub fn check(&self, response: &UpstreamResponse) -> Result<(), ProbeFailure> {
        if response.status != StatusCode::OK {
            return Err(ProbeFailure::BadStatus(response.status));
        }

        let body: Value = serde_json::from_slice(&response.body)
            .map_err(|e| ProbeFailure::NotJson(e.to_string()))?;

        match body.get(&self.state_field) {
            Some(Value::String(s)) if *s == self.ok_value => Ok(()),
            other => Err(ProbeFailure::BadState {
                field: self.state_field.clone(),
                found: other.map_or_else(|| "missing".to_string(), Value::to_string),
                expected: self.ok_value.clone(),
            }),
        }
    }

    /// Classify the outcome of a probe call.
    pub fn classify(
        &self,
        result: Result<UpstreamResponse, UpstreamError>,
    ) -> (HealthStatus, Option<ProbeFailure>) {
        match result.map_err(ProbeFailure::from).and_then(|r| self.check(&r)) {
            Ok(()) => (HealthStatus::Available, None),
            Err(failure) => (HealthStatus::Unavailable, Some(failure)),
        }
    }
}
