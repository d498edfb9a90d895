//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (GatewayConfig::default)
//!     → optional TOML file (loader.rs)
//!     → environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the backend list is static
//! - All fields have defaults so an empty environment still starts
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackendsConfig, GatewayConfig, HealthCheckConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RetryConfig, TimeoutConfig,
};
