//! Errors surfaced to gateway clients.

/// Failure of a client-facing operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// No backend was available, or every attempt failed.
    #[error("No storage services available")]
    ServiceUnavailable,
}
