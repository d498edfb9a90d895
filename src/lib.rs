//! Storage Gateway Library
//!
//! Tracks the health of a static set of storage services and routes data
//! requests round-robin over the currently available ones.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::{Gateway, Shutdown};
pub use registry::{Backend, HealthStatus, Registry};
pub use routing::Router;
