//! Host backend built on dense matrix multiply.
//!
//! Inner products come from a single `Q · Cᵀ` product. Squared Euclidean
//! distances reuse the same product through the norm expansion
//! `|q|² + |c|² - 2·q·c`, clamped at zero to absorb cancellation error.

use ndarray::ArrayView2;
use tracing::trace;

use super::{check_operands, ComputeBackend};
use crate::device::DeviceType;
use crate::error::ComputeResult;
use crate::matrix::{MatrixView, ScoreMatrix};
use crate::metric::MetricType;
use crate::norms::{norms_l2_squared, renormalize_l2};

/// Dense linear-algebra backend running on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBlasBackend;

impl CpuBlasBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBlasBackend {
    fn device_type(&self) -> DeviceType {
        DeviceType::CpuBlas
    }

    fn compute_scores(
        &self,
        queries: MatrixView<'_>,
        candidates: MatrixView<'_>,
        metric: MetricType,
    ) -> ComputeResult<ScoreMatrix> {
        if let Some(empty) = check_operands(&queries, &candidates)? {
            return Ok(empty);
        }

        let (nq, nc, dim) = (queries.rows(), candidates.rows(), queries.dim());
        trace!("cpu_blas gemm {}x{} · {}x{}ᵀ ({})", nq, dim, nc, dim, metric);

        let q = ArrayView2::from_shape((nq, dim), queries.as_slice())?;
        let c = ArrayView2::from_shape((nc, dim), candidates.as_slice())?;
        let mut scores = q.dot(&c.t());

        if metric == MetricType::L2Squared {
            let q_norms = norms_l2_squared(queries);
            let c_norms = norms_l2_squared(candidates);
            for (mut row, qn) in scores.rows_mut().into_iter().zip(q_norms.iter()) {
                for (v, cn) in row.iter_mut().zip(c_norms.iter()) {
                    *v = (qn + cn - 2.0 * *v).max(0.0);
                }
            }
        }

        ScoreMatrix::new(nq, nc, scores.iter().copied().collect())
    }

    fn normalize_l2(&self, vectors: &mut [f32], dim: usize) -> ComputeResult<()> {
        renormalize_l2(vectors, dim)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_product_scores() {
        let q = [1.0, 2.0];
        let c = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let scores = CpuBlasBackend::new()
            .compute_scores(
                MatrixView::new(&q, 2).unwrap(),
                MatrixView::new(&c, 2).unwrap(),
                MetricType::InnerProduct,
            )
            .unwrap();
        assert_eq!(scores.as_slice(), &[5.0, 11.0, 17.0]);
    }

    #[test]
    fn test_l2_scores_are_non_negative() {
        let q = [1e4, 1e4 + 1.0];
        let c = [1e4, 1e4 + 1.0, 0.0, 0.0];
        let scores = CpuBlasBackend::new()
            .compute_scores(
                MatrixView::new(&q, 2).unwrap(),
                MatrixView::new(&c, 2).unwrap(),
                MetricType::L2Squared,
            )
            .unwrap();
        assert!(scores.as_slice().iter().all(|s| *s >= 0.0));
        assert!(scores.get(0, 0).unwrap() < 1e-1 * scores.get(0, 1).unwrap());
    }

    #[test]
    fn test_multiple_queries_row_order() {
        let q = [1.0, 0.0, 0.0, 1.0];
        let c = [2.0, 3.0];
        let scores = CpuBlasBackend::new()
            .compute_scores(
                MatrixView::new(&q, 2).unwrap(),
                MatrixView::new(&c, 2).unwrap(),
                MetricType::InnerProduct,
            )
            .unwrap();
        assert_eq!(scores.row(0), &[2.0]);
        assert_eq!(scores.row(1), &[3.0]);
    }

    #[test]
    fn test_normalize_l2() {
        let mut data = vec![0.0, 5.0];
        CpuBlasBackend::new().normalize_l2(&mut data, 2).unwrap();
        assert_eq!(data, vec![0.0, 1.0]);
    }
}
