//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! GET /data
//!     → router.rs (candidates = registry.available())
//!     → round_robin.rs (shared cursor position)
//!     → failover.rs (pick candidate, record outcome, decide next step)
//!     → UpstreamClient GET <backend>/data
//!     → 200 body | ServiceUnavailable
//! ```
//!
//! # Design Decisions
//! - Selection and retry bookkeeping are pure and tested without I/O
//! - Only the available subset takes part in round-robin

pub mod failover;
pub mod round_robin;
pub mod router;

pub use failover::{AttemptOutcome, FailoverPlan};
pub use round_robin::RoundRobin;
pub use router::{Router, DATA_PATH};
