//! Append-only, fixed-capacity vector storage.
//!
//! The store owns one dense row-major buffer of `capacity * dim` floats,
//! allocated once by [`VectorStore::reserve`]. A `size` cursor marks how many
//! rows are live. Ids are row offsets, so no id bookkeeping is needed.

use lightfaiss_compute::MatrixView;
use tracing::trace;

use crate::errors::{IndexError, IndexResult};
use crate::types::VectorId;

/// Arena of fixed-length `f32` rows.
#[derive(Debug, Clone)]
pub struct VectorStore {
    dim: usize,
    capacity: usize,
    size: usize,
    data: Vec<f32>,
}

impl VectorStore {
    /// Allocate backing storage for `capacity` rows of length `dim`.
    ///
    /// # Errors
    ///
    /// Returns `CapacityError` if `capacity` or `dim` is zero, or if the buffer
    /// cannot be allocated.
    pub fn reserve(capacity: usize, dim: usize) -> IndexResult<Self> {
        if capacity == 0 {
            return Err(IndexError::capacity("capacity must be positive"));
        }
        if dim == 0 {
            return Err(IndexError::capacity("dimension must be positive"));
        }
        let too_large = || {
            IndexError::capacity(format!(
                "capacity {} x dimension {} cannot be allocated",
                capacity, dim
            ))
        };
        let len = capacity.checked_mul(dim).ok_or_else(too_large)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0.0);

        Ok(Self {
            dim,
            capacity,
            size: 0,
            data,
        })
    }

    /// Append a batch of rows and return the id assigned to the first one.
    ///
    /// The batch is appended entirely or not at all.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the batch row length differs from `dim`
    /// - `CapacityExceeded` if `size + rows > capacity`
    pub fn append(&mut self, vectors: MatrixView<'_>) -> IndexResult<VectorId> {
        if vectors.dim() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: vectors.dim(),
            });
        }

        let n = vectors.rows();
        if n > self.capacity - self.size {
            return Err(IndexError::CapacityExceeded {
                requested: n,
                size: self.size,
                capacity: self.capacity,
            });
        }

        let first = VectorId::from(self.size);
        let offset = self.size * self.dim;
        self.data[offset..offset + vectors.as_slice().len()].copy_from_slice(vectors.as_slice());
        self.size += n;

        trace!("Appended {} rows at id {}, size={}", n, first, self.size);
        Ok(first)
    }

    /// Read-only view of rows `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `RangeError` if `start > end` or `end > size`.
    pub fn slice(&self, start: usize, end: usize) -> IndexResult<MatrixView<'_>> {
        if start > end || end > self.size {
            return Err(IndexError::range(start, end, self.size));
        }
        Ok(self.live().slice_rows(start, end)?)
    }

    /// The row stored under `id`, if it has been appended.
    pub fn get(&self, id: VectorId) -> Option<&[f32]> {
        self.live().row(id.as_index())
    }

    /// All live rows.
    pub fn live(&self) -> MatrixView<'_> {
        // Length is a whole number of rows by construction
        MatrixView::new(&self.data[..self.size * self.dim], self.dim)
            .unwrap_or_else(|_| MatrixView::empty(self.dim))
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rows that can still be appended.
    pub fn remaining(&self) -> usize {
        self.capacity - self.size
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }
}

// ============================================================================
// Tests
// ============================================================================
