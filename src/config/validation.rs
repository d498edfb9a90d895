//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0, at least one attempt)
//! - Check that every storage service endpoint is an absolute http URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("storage service #{index} '{value}': {reason}")]
    InvalidEndpoint {
        index: usize,
        value: String,
        reason: String,
    },

    #[error("health_check.path '{0}' must start with '/'")]
    InvalidHealthPath(String),

    #[error("health_check.state_field must not be empty")]
    EmptyStateField,
}

/// Split a comma-separated endpoint list, dropping blank entries.
pub fn split_endpoints(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse one endpoint; `index` is its 0-based position after splitting.
pub fn parse_endpoint(index: usize, value: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidEndpoint {
        index: index + 1,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let positive = [
        ("health_check.interval_available_secs", config.health_check.interval_available_secs),
        ("health_check.interval_unavailable_secs", config.health_check.interval_unavailable_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("listener.request_timeout_secs", config.listener.request_timeout_secs),
        ("retries.max_attempts", u64::from(config.retries.max_attempts)),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (index, entry) in split_endpoints(&config.backends.storage_services).into_iter().enumerate() {
        if let Err(e) = parse_endpoint(index, entry) {
            errors.push(e);
        }
    }

    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath(config.health_check.path.clone()));
    }
    if config.health_check.state_field.trim().is_empty() {
        errors.push(ValidationError::EmptyStateField);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = GatewayConfig::default();
        config.health_check.interval_available_secs = 0;
        config.retries.max_attempts = 0;
        config.listener.bind_address = "nowhere".into();
        config.backends.storage_services = "http://ok:5000,https://tls:5000".into();
        config.health_check.path = "status".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.contains(&ValidationError::Zero {
            field: "retries.max_attempts"
        }));
        assert!(matches!(
            errors.iter().find(|e| matches!(e, ValidationError::InvalidEndpoint { .. })),
            Some(ValidationError::InvalidEndpoint { index: 2, .. })
        ));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn split_skips_blank_entries() {
        assert_eq!(split_endpoints("a, ,b,"), vec!["a", "b"]);
        assert!(split_endpoints("").is_empty());
    }
}
