//! Error types for medir
//!
//! One crate-wide error enum, following the fail-fast policy of the
//! benchmark protocol: a failed operation or barrier aborts the run and no
//! partial result is reported.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum MedirError {
    /// Benchmark or descriptor configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Tensor shape violates an operation's requirements
    #[error("Invalid shape: {reason}")]
    InvalidShape {
        /// Description of the shape violation
        reason: String,
    },

    /// The timed operation failed; the run is aborted without a result
    #[error("Operation failed during {operation}: {reason}")]
    OperationFailure {
        /// Which operation or iteration failed
        operation: String,
        /// Description of the failure
        reason: String,
    },

    /// The post-iteration barrier failed; timing integrity is lost
    #[error("Synchronization failed on backend '{backend}': {reason}")]
    SynchronizationFailure {
        /// Name of the backend whose barrier failed
        backend: String,
        /// Description of the failure
        reason: String,
    },
}

/// Result type for medir operations
pub type Result<T> = std::result::Result<T, MedirError>;
