//! Error types for backend construction and selection.

use thiserror::Error;

/// Configuration problems detected while building the backend set.
///
/// All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A backend address is not an absolute URI with a scheme and host.
    #[error("invalid backend address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// No backend addresses were supplied.
    #[error("no backends provided")]
    EmptyBackendSet,

    /// The sample width `k` was zero or negative.
    #[error("sample width k must be positive, got {0}")]
    InvalidSampleWidth(i64),
}

/// Runtime selection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no backends available")]
    NoBackendsAvailable,
}
