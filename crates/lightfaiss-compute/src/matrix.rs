//! Row-major matrix views and score matrices.

use crate::error::{ComputeError, ComputeResult};

// ============================================================================
// MatrixView
// ============================================================================

/// Borrowed row-major `f32` matrix of shape `(rows, dim)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixView<'a> {
    data: &'a [f32],
    rows: usize,
    dim: usize,
}

impl<'a> MatrixView<'a> {
    /// View a flat buffer as rows of length `dim`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `dim` is zero or the buffer length is not a
    /// multiple of `dim`.
    pub fn new(data: &'a [f32], dim: usize) -> ComputeResult<Self> {
        if dim == 0 {
            return Err(ComputeError::invalid_shape("row length must be positive"));
        }
        if data.len() % dim != 0 {
            return Err(ComputeError::invalid_shape(format!(
                "buffer of {} values is not a whole number of rows of length {}",
                data.len(),
                dim
            )));
        }
        Ok(Self {
            data,
            rows: data.len() / dim,
            dim,
        })
    }

    /// A matrix with no rows.
    pub fn empty(dim: usize) -> Self {
        Self { data: &[], rows: 0, dim }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row length.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The underlying flat buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Row `i`, or `None` when out of bounds.
    pub fn row(&self, i: usize) -> Option<&'a [f32]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.data[i * self.dim..(i + 1) * self.dim])
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [f32]> + 'a {
        let data = self.data;
        data.chunks_exact(self.dim.max(1))
    }

    /// Rows `[start, end)` as a new view.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if the range is malformed or exceeds `rows`.
    pub fn slice_rows(&self, start: usize, end: usize) -> ComputeResult<MatrixView<'a>> {
        if start > end || end > self.rows {
            return Err(ComputeError::invalid_shape(format!(
                "row range [{}, {}) outside matrix of {} rows",
                start, end, self.rows
            )));
        }
        Ok(Self {
            data: &self.data[start * self.dim..end * self.dim],
            rows: end - start,
            dim: self.dim,
        })
    }
}

// ============================================================================
// ScoreMatrix
// ============================================================================

/// Dense `(queries, candidates)` score matrix produced by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ScoreMatrix {
    /// Wrap a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> ComputeResult<Self> {
        if data.len() != rows * cols {
            return Err(ComputeError::invalid_shape(format!(
                "score buffer has {} values, expected {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// A matrix with `rows` empty rows.
    pub fn empty(rows: usize) -> Self {
        Self {
            rows,
            cols: 0,
            data: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Scores of query `i` against every candidate.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Score of query `i` against candidate `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        Some(self.data[i * self.cols + j])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

// ============================================================================
// Tests
// ============================================================================
