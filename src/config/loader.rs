//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_STORAGE_SERVICES: &str = "STORAGE_SERVICES";
pub const ENV_INTERVAL_AVAILABLE: &str = "MONITORING_INTERVAL_AVAILABLE";
pub const ENV_INTERVAL_UNAVAILABLE: &str = "MONITORING_INTERVAL_UNAVAILABLE";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
pub const ENV_HEALTH_PATH: &str = "HEALTH_CHECK_PATH";
pub const ENV_HEALTH_STATE_FIELD: &str = "HEALTH_STATE_FIELD";
pub const ENV_HEALTH_OK_VALUE: &str = "HEALTH_OK_VALUE";
pub const ENV_MAX_ATTEMPTS: &str = "MAX_ATTEMPTS";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";
pub const ENV_METRICS_ADDRESS: &str = "METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file plus the process environment,
/// let `adjust` apply command-line overrides, then validate it.
pub fn load_config<F>(path: Option<&Path>, adjust: F) -> Result<GatewayConfig, ConfigError>
where
    F: FnOnce(&mut GatewayConfig),
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => GatewayConfig::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    adjust(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse a TOML file. Missing sections fall back to defaults.
pub fn read_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides read through `lookup`.
///
/// Unset variables leave the current value in place.
pub fn apply_env<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_STORAGE_SERVICES) {
        config.backends.storage_services = v;
    }
    if let Some(v) = parsed(&lookup, ENV_INTERVAL_AVAILABLE)? {
        config.health_check.interval_available_secs = v;
    }
    if let Some(v) = parsed(&lookup, ENV_INTERVAL_UNAVAILABLE)? {
        config.health_check.interval_unavailable_secs = v;
    }
    if let Some(v) = parsed(&lookup, ENV_REQUEST_TIMEOUT)? {
        config.timeouts.request_secs = v;
    }
    if let Some(v) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = v.to_lowercase();
    }
    if let Some(v) = parsed(&lookup, ENV_LOG_FORMAT)? {
        config.observability.log_format = v;
    }
    if let Some(v) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
    if let Some(v) = lookup(ENV_HEALTH_PATH) {
        config.health_check.path = v;
    }
    if let Some(v) = lookup(ENV_HEALTH_STATE_FIELD) {
        config.health_check.state_field = v;
    }
    if let Some(v) = lookup(ENV_HEALTH_OK_VALUE) {
        config.health_check.ok_value = v;
    }
    if let Some(v) = parsed(&lookup, ENV_MAX_ATTEMPTS)? {
        config.retries.max_attempts = v;
    }
    if let Some(v) = parsed(&lookup, ENV_METRICS_ENABLED)? {
        config.observability.metrics_enabled = v;
    }
    if let Some(v) = lookup(ENV_METRICS_ADDRESS) {
        config.observability.metrics_address = v;
    }
    Ok(())
}

fn parsed<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
    }
}
