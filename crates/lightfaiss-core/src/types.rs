//! Identifiers and search result types.

use serde::{Deserialize, Serialize};

// ============================================================================
// VectorId
// ============================================================================

/// Store-assigned identifier of a vector.
///
/// Ids are row offsets into the store: 0-based, assigned in append order,
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorId(pub u64);

impl VectorId {
    /// Create a new vector ID.
    pub fn new(id: u64) -> Self {
        VectorId(id)
    }

    /// Get the underlying ID value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Row offset in the store.
    pub fn as_index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for VectorId {
    fn from(id: u64) -> Self {
        VectorId(id)
    }
}

impl From<usize> for VectorId {
    fn from(id: usize) -> Self {
        VectorId(id as u64)
    }
}

impl std::fmt::Display for VectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Neighbor
// ============================================================================

/// A single scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Global store id of the candidate.
    pub id: VectorId,
    /// Score under the index metric.
    pub score: f32,
}

impl Neighbor {
    pub fn new(id: impl Into<VectorId>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

// ============================================================================
// SearchResults
// ============================================================================

/// Top-k results for a batch of queries.
///
/// Stored as two `(n_queries, k)` row-major matrices, where `k` is the
/// effective k: `min(requested k, candidates in range)`. Each row is ordered
/// best-first under the index metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    n_queries: usize,
    k: usize,
    distances: Vec<f32>,
    indices: Vec<VectorId>,
}

impl SearchResults {
    /// Results with `n_queries` empty rows.
    pub fn empty(n_queries: usize) -> Self {
        Self {
            n_queries,
            k: 0,
            distances: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Assemble results from per-query rows of equal length `k`.
    pub(crate) fn from_rows(k: usize, rows: Vec<Vec<Neighbor>>) -> Self {
        let n_queries = rows.len();
        let mut distances = Vec::with_capacity(n_queries * k);
        let mut indices = Vec::with_capacity(n_queries * k);
        for row in rows {
            debug_assert_eq!(row.len(), k);
            for neighbor in row {
                distances.push(neighbor.score);
                indices.push(neighbor.id);
            }
        }
        Self {
            n_queries,
            k,
            distances,
            indices,
        }
    }

    /// Number of query rows.
    pub fn n_queries(&self) -> usize {
        self.n_queries
    }

    /// Effective k (row length).
    pub fn k(&self) -> usize {
        self.k
    }

    /// Flat `(n_queries, k)` score matrix.
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Flat `(n_queries, k)` id matrix.
    pub fn indices(&self) -> &[VectorId] {
        &self.indices
    }

    /// Scores for query `i`.
    pub fn distances_row(&self, i: usize) -> &[f32] {
        &self.distances[i * self.k..(i + 1) * self.k]
    }

    /// Ids for query `i`.
    pub fn indices_row(&self, i: usize) -> &[VectorId] {
        &self.indices[i * self.k..(i + 1) * self.k]
    }

    /// Neighbors of query `i`, best first.
    pub fn neighbors(&self, i: usize) -> Vec<Neighbor> {
        self.indices_row(i)
            .iter()
            .zip(self.distances_row(i))
            .map(|(id, score)| Neighbor::new(*id, *score))
            .collect()
    }

    /// Split into the flat `(distances, indices)` matrices.
    pub fn into_parts(self) -> (Vec<f32>, Vec<VectorId>) {
        (self.distances, self.indices)
    }
}

// ============================================================================
// Tests
// ============================================================================
