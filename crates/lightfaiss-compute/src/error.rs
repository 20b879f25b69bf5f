//! Error types for lightfaiss-compute.

use thiserror::Error;

use crate::device::DeviceType;

/// Result type alias for lightfaiss-compute operations.
pub type ComputeResult<T> = Result<T, ComputeError>;

/// Errors that can occur while scoring vectors on a compute backend.
#[derive(Debug, Error)]
pub enum ComputeError {
    // ========================================================================
    // Backend errors
    // ========================================================================
    /// The requested backend has no usable resources.
    #[error("Compute backend '{device}' not available: {reason}")]
    BackendUnavailable { device: DeviceType, reason: String },

    /// The tensor runtime failed while running a pipeline.
    #[error("Device error: {message}")]
    Device { message: String },

    // ========================================================================
    // Shape errors
    // ========================================================================
    /// Two matrices disagree on row length.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A buffer cannot be viewed as a row-major matrix.
    #[error("Invalid matrix shape: {message}")]
    InvalidShape { message: String },
}

impl ComputeError {
    /// Create a backend unavailable error.
    pub fn backend_unavailable(device: DeviceType, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            device,
            reason: reason.into(),
        }
    }

    /// Create a device error.
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device {
            message: message.into(),
        }
    }

    /// Create an invalid shape error.
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }
}

impl From<candle_core::Error> for ComputeError {
    fn from(err: candle_core::Error) -> Self {
        Self::Device {
            message: err.to_string(),
        }
    }
}

impl From<ndarray::ShapeError> for ComputeError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::InvalidShape {
            message: err.to_string(),
        }
    }
}
