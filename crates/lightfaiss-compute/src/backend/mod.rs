//! Compute backend implementations.
//!
//! Every backend turns `(queries, candidates, metric)` into the same score
//! matrix; they differ only in where and how the arithmetic runs.
//!
//! ## Available Backends
//!
//! - `cpu_blas`: dense matrix multiply on the host (ndarray / matrixmultiply)
//! - `gpu_compute`: tensor pipeline dispatched through a [`ComputeManager`]

mod cpu_blas;
mod gpu;

pub use cpu_blas::CpuBlasBackend;
pub use gpu::GpuComputeBackend;

use tracing::debug;

use crate::device::DeviceType;
use crate::error::{ComputeError, ComputeResult};
use crate::manager::ComputeManager;
use crate::matrix::{MatrixView, ScoreMatrix};
use crate::metric::MetricType;

// ============================================================================
// ComputeBackend Trait
// ============================================================================

/// Execution strategy for batched score computation.
///
/// ## Implementation Notes
///
/// - `compute_scores` returns a `(queries.rows(), candidates.rows())` matrix in
///   row-major order, with the numeric meaning defined by
///   [`MetricType::score`]. Results from different backends agree within a
///   relative tolerance of `1e-4`.
/// - Calls are synchronous: when the method returns, device work is complete.
pub trait ComputeBackend: Send + Sync {
    /// Which device type this backend implements.
    fn device_type(&self) -> DeviceType;

    /// Score every query row against every candidate row.
    fn compute_scores(
        &self,
        queries: MatrixView<'_>,
        candidates: MatrixView<'_>,
        metric: MetricType,
    ) -> ComputeResult<ScoreMatrix>;

    /// Rescale every row of `vectors` (rows of length `dim`) to unit L2 norm.
    fn normalize_l2(&self, vectors: &mut [f32], dim: usize) -> ComputeResult<()>;
}

/// Validate operand shapes shared by every backend.
///
/// Returns `Some(empty matrix)` when there is nothing to dispatch.
fn check_operands(
    queries: &MatrixView<'_>,
    candidates: &MatrixView<'_>,
) -> ComputeResult<Option<ScoreMatrix>> {
    if queries.dim() != candidates.dim() {
        return Err(ComputeError::DimensionMismatch {
            expected: candidates.dim(),
            actual: queries.dim(),
        });
    }
    if queries.is_empty() || candidates.is_empty() {
        return Ok(Some(ScoreMatrix::empty(queries.rows())));
    }
    Ok(None)
}

// ============================================================================
// Backend selection
// ============================================================================

/// Select the backend for a single call.
///
/// `CpuBlas` is always available. `GpuCompute` borrows `manager` and fails
/// with `BackendUnavailable` when none is supplied.
pub fn select_backend<'m>(
    device: DeviceType,
    manager: Option<&'m ComputeManager>,
) -> ComputeResult<Box<dyn ComputeBackend + 'm>> {
    debug!("Selecting compute backend {}", device);

    match device {
        DeviceType::CpuBlas => Ok(Box::new(CpuBlasBackend::new())),
        DeviceType::GpuCompute => match manager {
            Some(manager) => Ok(Box::new(GpuComputeBackend::new(manager))),
            None => Err(ComputeError::backend_unavailable(
                device,
                "no compute manager was supplied",
            )),
        },
    }
}

/// Device types that can be served with the given manager.
pub fn available_backends(manager: Option<&ComputeManager>) -> Vec<DeviceType> {
    let mut backends = vec![DeviceType::CpuBlas];
    if manager.is_some() {
        backends.push(DeviceType::GpuCompute);
    }
    backends
}

// ============================================================================
// Tests
// ============================================================================
