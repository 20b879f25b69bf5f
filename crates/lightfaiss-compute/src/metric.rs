//! Similarity and distance metrics.
//!
//! [`MetricType`] is the single source of truth for both how two vectors are
//! scored and which direction of the score is "closer". Backends consume it to
//! compute score matrices; the top-k selector consumes [`MetricType::compare`]
//! to order them, so the two can never disagree.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{ComputeError, ComputeResult};
use crate::matrix::{MatrixView, ScoreMatrix};

// ============================================================================
// MetricType
// ============================================================================

/// Metric used to compare vectors. Fixed when an index is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Maximum inner product search. Higher is closer.
    #[default]
    InnerProduct,
    /// Squared Euclidean distance. Lower is closer.
    L2Squared,
}

impl MetricType {
    /// Get the metric name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::InnerProduct => "inner_product",
            MetricType::L2Squared => "l2_squared",
        }
    }

    /// Whether a larger score means a closer candidate.
    pub fn higher_is_better(&self) -> bool {
        match self {
            MetricType::InnerProduct => true,
            MetricType::L2Squared => false,
        }
    }

    /// Score a single pair of rows.
    pub fn score(&self, query: &[f32], candidate: &[f32]) -> f32 {
        match self {
            MetricType::InnerProduct => inner_product(query, candidate),
            MetricType::L2Squared => l2_squared(query, candidate),
        }
    }

    /// Order two scores best-first.
    ///
    /// `Less` means `a` ranks ahead of `b`. NaN ranks behind every number.
    pub fn compare(&self, a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                if self.higher_is_better() {
                    b.total_cmp(&a)
                } else {
                    a.total_cmp(&b)
                }
            }
        }
    }

    /// Scalar reference form of the batched score computation.
    ///
    /// Every backend must agree with this within floating-point tolerance.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the two matrices have different row lengths.
    pub fn score_matrix(
        &self,
        queries: MatrixView<'_>,
        candidates: MatrixView<'_>,
    ) -> ComputeResult<ScoreMatrix> {
        if queries.dim() != candidates.dim() {
            return Err(ComputeError::DimensionMismatch {
                expected: candidates.dim(),
                actual: queries.dim(),
            });
        }

        let mut data = Vec::with_capacity(queries.rows() * candidates.rows());
        for q in queries.iter_rows() {
            data.extend(candidates.iter_rows().map(|c| self.score(q, c)));
        }
        ScoreMatrix::new(queries.rows(), candidates.rows(), data)
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MetricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inner_product" | "ip" | "dot" => Ok(Self::InnerProduct),
            "l2_squared" | "l2" => Ok(Self::L2Squared),
            _ => Err(format!(
                "Unknown metric: '{}'. Use 'inner_product' or 'l2_squared'.",
                s
            )),
        }
    }
}

// ============================================================================
// Scalar kernels
// ============================================================================

/// Dot product of two rows.
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Sum of squared elementwise differences.
pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

// ============================================================================
// Tests
// ============================================================================
