//! Row norms and in-place L2 renormalization on the host.

use rayon::prelude::*;

use crate::error::ComputeResult;
use crate::matrix::MatrixView;

/// Row count above which renormalization fans out across the rayon pool.
pub const PARALLEL_RENORM_THRESHOLD: usize = 10_000;

/// Squared L2 norm of one row.
pub fn norm_l2_squared(row: &[f32]) -> f32 {
    row.iter().map(|x| x * x).sum()
}

/// Squared L2 norm of every row.
pub fn norms_l2_squared(matrix: MatrixView<'_>) -> Vec<f32> {
    matrix.iter_rows().map(norm_l2_squared).collect()
}

/// Rescale every row of `data` to unit L2 norm. Zero rows are left untouched.
///
/// # Errors
///
/// Returns `InvalidShape` if `data` is not a whole number of rows of length `dim`.
pub fn renormalize_l2(data: &mut [f32], dim: usize) -> ComputeResult<()> {
    let rows = MatrixView::new(data, dim)?.rows();
    if rows > PARALLEL_RENORM_THRESHOLD {
        data.par_chunks_mut(dim).for_each(renormalize_row);
    } else {
        data.chunks_mut(dim).for_each(renormalize_row);
    }
    Ok(())
}

fn renormalize_row(row: &mut [f32]) {
    let norm = norm_l2_squared(row);
    if norm > 0.0 {
        let inv = 1.0 / norm.sqrt();
        row.iter_mut().for_each(|x| *x *= inv);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norms_l2_squared() {
        let data = [3.0, 4.0, 1.0, 0.0];
        let norms = norms_l2_squared(MatrixView::new(&data, 2).unwrap());
        assert_eq!(norms, vec![25.0, 1.0]);
    }

    #[test]
    fn test_renormalize_l2_unit_rows() {
        let mut data = vec![3.0, 4.0, 0.0, 0.0, 0.0, 2.0];
        renormalize_l2(&mut data, 2).unwrap();
        assert!((data[0] - 0.6).abs() < 1e-6);
        assert!((data[1] - 0.8).abs() < 1e-6);
        // Zero row stays zero
        assert_eq!(&data[2..4], &[0.0, 0.0]);
        assert!((data[5] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_renormalize_l2_parallel_path() {
        let rows = PARALLEL_RENORM_THRESHOLD + 1;
        let mut data: Vec<f32> = (0..rows).flat_map(|i| [i as f32 + 1.0, 1.0]).collect();
        renormalize_l2(&mut data, 2).unwrap();
        for row in data.chunks(2) {
            assert!((norm_l2_squared(row) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_renormalize_l2_rejects_ragged() {
        let mut data = vec![1.0, 2.0, 3.0];
        assert!(renormalize_l2(&mut data, 2).is_err());
    }
}
