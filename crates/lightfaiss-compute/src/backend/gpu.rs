//! Accelerator backend dispatching tensor pipelines through a [`ComputeManager`].
//!
//! Each call uploads the operands into device-resident tensors, records the
//! score pipeline, waits for the device, and reads the result back. There is
//! no overlap between calls.

use candle_core::Tensor;
use tracing::trace;

use super::{check_operands, ComputeBackend};
use crate::device::DeviceType;
use crate::error::ComputeResult;
use crate::manager::ComputeManager;
use crate::matrix::{MatrixView, ScoreMatrix};
use crate::metric::MetricType;

/// Backend that runs on the device owned by a borrowed [`ComputeManager`].
#[derive(Debug, Clone, Copy)]
pub struct GpuComputeBackend<'m> {
    manager: &'m ComputeManager,
}

impl<'m> GpuComputeBackend<'m> {
    pub fn new(manager: &'m ComputeManager) -> Self {
        Self { manager }
    }

    /// `Q · Cᵀ` on the device.
    fn inner_products(q: &Tensor, c: &Tensor) -> ComputeResult<Tensor> {
        Ok(q.matmul(&c.t()?.contiguous()?)?)
    }

    /// `|q|² + |c|² - 2·q·c`, clamped at zero.
    fn squared_distances(q: &Tensor, c: &Tensor) -> ComputeResult<Tensor> {
        let ip = Self::inner_products(q, c)?;
        let q_norms = q.sqr()?.sum_keepdim(1)?;
        let c_norms = c.sqr()?.sum_keepdim(1)?.t()?;
        let sums = q_norms.broadcast_add(&c_norms)?;
        Ok(sums.sub(&ip.affine(2.0, 0.0)?)?.relu()?)
    }

    /// Wait for the device and copy a 2-D tensor back to the host.
    fn read_back(&self, tensor: &Tensor) -> ComputeResult<Vec<f32>> {
        self.manager.synchronize()?;
        Ok(tensor.flatten_all()?.to_vec1::<f32>()?)
    }
}

impl ComputeBackend for GpuComputeBackend<'_> {
    fn device_type(&self) -> DeviceType {
        DeviceType::GpuCompute
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

        trace!(
            "gpu_compute dispatch on {}: {} queries x {} candidates ({})",
            self.manager.device_name(),
            queries.rows(),
            candidates.rows(),
            metric
        );

        let q = self.manager.upload(queries)?;
        let c = self.manager.upload(candidates)?;
        let scores = match metric {
            MetricType::InnerProduct => Self::inner_products(&q, &c)?,
            MetricType::L2Squared => Self::squared_distances(&q, &c)?,
        };

        let data = self.read_back(&scores)?;
        ScoreMatrix::new(queries.rows(), candidates.rows(), data)
    }

    fn normalize_l2(&self, vectors: &mut [f32], dim: usize) -> ComputeResult<()> {
        let normalized = {
            let view = MatrixView::new(vectors, dim)?;
            if view.is_empty() {
                return Ok(());
            }
            let x = self.manager.upload(view)?;
            let norms = x.sqr()?.sum_keepdim(1)?.sqrt()?;
            // Zero rows divide by one and stay zero
            let denom = norms.gt(0f32)?.where_cond(&norms, &norms.ones_like()?)?;
            self.read_back(&x.broadcast_div(&denom)?)?
        };
        vectors.copy_from_slice(&normalized);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_product_pipeline() {
        let manager = ComputeManager::cpu();
        let q = [1.0, 2.0];
        let c = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let scores = GpuComputeBackend::new(&manager)
            .compute_scores(
                MatrixView::new(&q, 2).unwrap(),
                MatrixView::new(&c, 2).unwrap(),
                MetricType::InnerProduct,
            )
            .unwrap();
        assert_eq!(scores.rows(), 1);
        assert_eq!(scores.cols(), 3);
        for (got, want) in scores.as_slice().iter().zip([5.0, 11.0, 17.0]) {
            assert!((got - want).abs() < 1e-4);
        }
    }

    #[test]
    fn test_l2_pipeline() {
        let manager = ComputeManager::cpu();
        let q = [1.0, 2.0, 0.0, 0.0];
        let c = [1.0, 2.0, 3.0, 4.0];
        let scores = GpuComputeBackend::new(&manager)
            .compute_scores(
                MatrixView::new(&q, 2).unwrap(),
                MatrixView::new(&c, 2).unwrap(),
                MetricType::L2Squared,
            )
            .unwrap();
        let want = [0.0, 8.0, 5.0, 25.0];
        for (got, want) in scores.as_slice().iter().zip(want) {
            assert!((got - want).abs() < 1e-4, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_normalize_l2_pipeline() {
        let manager = ComputeManager::cpu();
        let mut data = vec![3.0, 4.0, 0.0, 0.0];
        GpuComputeBackend::new(&manager)
            .normalize_l2(&mut data, 2)
            .unwrap();
        assert!((data[0] - 0.6).abs() < 1e-6);
        assert!((data[1] - 0.8).abs() < 1e-6);
        assert_eq!(&data[2..], &[0.0, 0.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let manager = ComputeManager::cpu();
        let q = [1.0, 2.0, 3.0];
        let c = [1.0, 2.0];
        let err = GpuComputeBackend::new(&manager)
            .compute_scores(
                MatrixView::new(&q, 3).unwrap(),
                MatrixView::new(&c, 2).unwrap(),
                MetricType::InnerProduct,
            )
            .unwrap_err();
        assert!(matches!(err, crate::ComputeError::DimensionMismatch { .. }));
    }
}
