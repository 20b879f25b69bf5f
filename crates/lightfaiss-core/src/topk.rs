//! Metric-aware top-k selection.
//!
//! Candidates are ordered by score in the metric's direction (descending for
//! inner product, ascending for squared L2), then by ascending id. Because ids
//! are unique the order is total, so repeated selections are identical.

use std::cmp::Ordering;

use lightfaiss_compute::MetricType;

use crate::errors::{IndexError, IndexResult};
use crate::types::{Neighbor, VectorId};

/// Selects the k best candidates from a row of scores.
#[derive(Debug, Clone, Copy)]
pub struct TopKSelector {
    metric: MetricType,
}

impl TopKSelector {
    pub fn new(metric: MetricType) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> MetricType {
        self.metric
    }

    /// Best-first ordering of two candidates.
    pub fn compare(&self, a: &Neighbor, b: &Neighbor) -> Ordering {
        self.metric
            .compare(a.score, b.score)
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Select the best `min(k, scores.len())` candidates, best first.
    ///
    /// `candidate_ids[j]` is the id scored by `scores[j]`.
    ///
    /// # Errors
    ///
    /// - `InvalidK` if `k == 0`
    /// - `DimensionMismatch` if `scores` and `candidate_ids` differ in length
    pub fn select(
        &self,
        scores: &[f32],
        k: usize,
        candidate_ids: &[VectorId],
    ) -> IndexResult<Vec<Neighbor>> {
        if k == 0 {
            return Err(IndexError::InvalidK { k });
        }
        if scores.len() != candidate_ids.len() {
            return Err(IndexError::DimensionMismatch {
                expected: candidate_ids.len(),
                actual: scores.len(),
            });
        }

        let mut candidates: Vec<Neighbor> = candidate_ids
            .iter()
            .zip(scores)
            .map(|(id, score)| Neighbor::new(*id, *score))
            .collect();

        let k = k.min(candidates.len());
        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, |a, b| self.compare(a, b));
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(|a, b| self.compare(a, b));
        Ok(candidates)
    }

    /// Same as [`select`](Self::select) for a contiguous id range starting at `first_id`.
    pub fn select_range(
        &self,
        scores: &[f32],
        k: usize,
        first_id: VectorId,
    ) -> IndexResult<Vec<Neighbor>> {
        let ids: Vec<VectorId> = (0..scores.len() as u64)
            .map(|offset| VectorId(first_id.value() + offset))
            .collect();
        self.select(scores, k, &ids)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<VectorId> {
        (0..n).map(VectorId).collect()
    }

    #[test]
    fn test_select_inner_product_descending() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        let top = selector.select(&[5.0, 11.0, 17.0], 2, &ids(3)).unwrap();
        assert_eq!(top, vec![Neighbor::new(2u64, 17.0), Neighbor::new(1u64, 11.0)]);
    }

    #[test]
    fn test_select_l2_ascending() {
        let selector = TopKSelector::new(MetricType::L2Squared);
        let top = selector.select(&[0.0, 8.0, 32.0, 2.0], 3, &ids(4)).unwrap();
        let got: Vec<u64> = top.iter().map(|n| n.id.value()).collect();
        assert_eq!(got, vec![0, 3, 1]);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        let candidate_ids = [VectorId(9), VectorId(4), VectorId(7), VectorId(1)];
        let top = selector
            .select(&[1.0, 3.0, 3.0, 3.0], 3, &candidate_ids)
            .unwrap();
        let got: Vec<u64> = top.iter().map(|n| n.id.value()).collect();
        assert_eq!(got, vec![1, 4, 7]);
    }

    #[test]
    fn test_k_larger_than_candidates() {
        let selector = TopKSelector::new(MetricType::L2Squared);
        let top = selector.select(&[3.0, 1.0], 10, &ids(2)).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, VectorId(1));
    }

    #[test]
    fn test_zero_k_fails() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        assert!(matches!(
            selector.select(&[1.0], 0, &ids(1)),
            Err(IndexError::InvalidK { k: 0 })
        ));
    }

    #[test]
    fn test_empty_candidates() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        assert!(selector.select(&[], 5, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        assert!(selector.select(&[1.0, 2.0], 1, &ids(1)).is_err());
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        let top = selector
            .select(&[f32::NAN, -5.0, 2.0], 2, &ids(3))
            .unwrap();
        let got: Vec<u64> = top.iter().map(|n| n.id.value()).collect();
        assert_eq!(got, vec![2, 1]);
    }

    #[test]
    fn test_select_range_uses_global_ids() {
        let selector = TopKSelector::new(MetricType::InnerProduct);
        let top = selector.select_range(&[1.0, 4.0, 2.0], 1, VectorId(100)).unwrap();
        assert_eq!(top, vec![Neighbor::new(101u64, 4.0)]);
    }

    #[test]
    fn test_matches_full_sort() {
        let selector = TopKSelector::new(MetricType::L2Squared);
        let scores: Vec<f32> = (0..200).map(|i| ((i * 37) % 23) as f32).collect();
        let top = selector.select(&scores, 15, &ids(200)).unwrap();

        let mut all = selector.select(&scores, 200, &ids(200)).unwrap();
        all.truncate(15);
        assert_eq!(top, all);
    }
}
