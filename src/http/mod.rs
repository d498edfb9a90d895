//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Client connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing::Router (status snapshot or data dispatch)
//!     → client.rs (downstream GET to a storage service)
//!     → response.rs (forward body or map error)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod server;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
