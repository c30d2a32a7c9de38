//! Error types for waveplan-doc operations.

use thiserror::Error;

/// The error type for waveplan-doc operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Text that does not have the `{phase}-{sequence}` form of a plan id.
    #[error("Invalid plan id '{input}': {reason}")]
    InvalidPlanId {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// A specialized Result type for waveplan-doc operations.
pub type Result<T> = std::result::Result<T, Error>;
