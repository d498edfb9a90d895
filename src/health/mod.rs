//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Per-backend loop (active.rs):
//!     GET <backend><path> with timeout
//!     → probe.rs classifies (Available / Unavailable)
//!     → Registry::set_status
//!     → sleep interval_available | interval_unavailable
//!     → repeat until shutdown
//! ```
//!
//! # Design Decisions
//! - One loop per backend; a slow backend never delays the others
//! - A single probe decides the status (no thresholds)
//! - Available backends are polled more often than unavailable ones

pub mod active;
pub mod probe;

pub use active::{HealthMonitor, MonitorHandle};
pub use probe::{ProbeExpectation, ProbeFailure};
