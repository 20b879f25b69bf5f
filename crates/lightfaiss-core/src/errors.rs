//! Error types for lightfaiss-core.

use lightfaiss_compute::{ComputeError, DeviceType};
use thiserror::Error;

/// Result type alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors reported by the flat index and its vector store.
///
/// Every failure is synchronous and leaves the index unchanged.
#[derive(Error, Debug)]
pub enum IndexError {
    // ========================================================================
    // Construction
    // ========================================================================
    /// Invalid construction parameters (zero dimension or capacity).
    #[error("Invalid index parameters: {message}")]
    CapacityError { message: String },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    // ========================================================================
    // Data errors
    // ========================================================================
    /// A row length differs from the index dimension.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Appending would exceed the reserved capacity.
    #[error("Capacity exceeded: cannot append {requested} vectors to {size}/{capacity}")]
    CapacityExceeded {
        requested: usize,
        size: usize,
        capacity: usize,
    },

    /// Malformed or out-of-bounds range against the current size.
    #[error("Invalid range [{start}, {end}) for store of {size} vectors")]
    RangeError {
        start: usize,
        end: usize,
        size: usize,
    },

    /// `k` must be positive.
    #[error("Invalid k: {k}. k must be at least 1")]
    InvalidK { k: usize },

    // ========================================================================
    // Backend errors
    // ========================================================================
    /// The requested backend has no usable resources.
    #[error("Backend '{device}' unavailable: {reason}")]
    BackendUnavailable { device: DeviceType, reason: String },

    /// The backend failed while computing scores.
    #[error("Compute error: {0}")]
    Compute(ComputeError),

    // ========================================================================
    // Configuration I/O
    // ========================================================================
    /// IO error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error wrapper.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl IndexError {
    /// Create a capacity (construction) error.
    pub fn capacity(message: impl Into<String>) -> Self {
        Self::CapacityError {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create a range error.
    pub fn range(start: usize, end: usize, size: usize) -> Self {
        Self::RangeError { start, end, size }
    }
}

impl From<ComputeError> for IndexError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::BackendUnavailable { device, reason } => {
                Self::BackendUnavailable { device, reason }
            }
            ComputeError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            other => Self::Compute(other),
        }
    }
}
