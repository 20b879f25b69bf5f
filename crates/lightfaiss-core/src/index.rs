//! Exact brute-force vector index.
//!
//! ## Lifecycle
//!
//! A [`FlatIndex`] is constructed with a fixed dimension, capacity and metric,
//! then populated with [`FlatIndex::add`] and searched with
//! [`FlatIndex::query_range`]. Neither the parameters nor the stored rows ever
//! change after the fact; the store only grows.
//!
//! ## Range queries
//!
//! `query_range` scores the queries against rows `[start, end)` only, and
//! reports global store ids. Callers that page through a large store in
//! sub-ranges merge the per-range results themselves.
//!
//! ## Thread Safety
//!
//! `add` takes `&mut self`, queries take `&self`, so concurrent queries are
//! fine and mutation is excluded by the borrow checker. The compute manager is
//! borrowed for the index lifetime and is never torn down by the index.

use lightfaiss_compute::{select_backend, ComputeManager, DeviceType, MatrixView, MetricType};
use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::errors::{IndexError, IndexResult};
use crate::store::VectorStore;
use crate::topk::TopKSelector;
use crate::types::{SearchResults, VectorId};

/// Exact nearest-neighbor index over an append-only vector store.
#[derive(Debug)]
pub struct FlatIndex<'m> {
    config: IndexConfig,
    store: VectorStore,
    selector: TopKSelector,
    manager: Option<&'m ComputeManager>,
}

impl<'m> FlatIndex<'m> {
    /// Create an index from configuration.
    ///
    /// `manager` may be `None` when only the `CpuBlas` backend will be used;
    /// `GpuCompute` queries then fail with `BackendUnavailable`.
    ///
    /// # Errors
    ///
    /// Returns `CapacityError` if the dimension or capacity is zero.
    pub fn new(config: IndexConfig, manager: Option<&'m ComputeManager>) -> IndexResult<Self> {
        for warning in config.validate()? {
            tracing::warn!("Index config warning: {}", warning);
        }
        let store = VectorStore::reserve(config.capacity, config.dimension)?;

        info!(
            "Created flat index (dim={}, capacity={}, metric={}, compute={})",
            config.dimension,
            config.capacity,
            config.metric,
            manager.map(|m| m.device_name()).unwrap_or("none")
        );

        Ok(Self {
            selector: TopKSelector::new(config.metric),
            config,
            store,
            manager,
        })
    }

    /// Create an index from positional construction parameters.
    pub fn with_params(
        dimension: usize,
        capacity: usize,
        float16_storage: bool,
        metric: MetricType,
        manager: Option<&'m ComputeManager>,
    ) -> IndexResult<Self> {
        let config = IndexConfig::new(dimension, capacity)
            .with_metric(metric)
            .with_float16_storage(float16_storage);
        Self::new(config, manager)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a row-major batch and return the id of its first row.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the batch row length differs from the index dimension
    /// - `CapacityExceeded` if the batch does not fit; nothing is appended
    pub fn add(&mut self, vectors: MatrixView<'_>) -> IndexResult<VectorId> {
        let first = self.store.append(vectors)?;
        debug!(
            "Added {} vectors (first id {}, size={}/{})",
            vectors.rows(),
            first,
            self.store.len(),
            self.store.capacity()
        );
        Ok(first)
    }

    /// Append rows given one at a time.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add); every row is checked before anything is appended.
    pub fn add_rows<R: AsRef<[f32]>>(&mut self, rows: &[R]) -> IndexResult<VectorId> {
        let dim = self.dimension();
        let mut flat = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        self.add(MatrixView::new(&flat, dim)?)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Top-k search of `queries` against stored rows `[range_start, range_end)`.
    ///
    /// Every result row has length `min(k, range_end - range_start)` and holds
    /// global store ids, best first; ties go to the lower id.
    ///
    /// # Errors
    ///
    /// - `InvalidK` if `k == 0`
    /// - `RangeError` if `range_start > range_end` or `range_end > len()`
    /// - `DimensionMismatch` if the query row length differs from the index dimension
    /// - `BackendUnavailable` if `GpuCompute` is requested without a compute manager
    pub fn query_range(
        &self,
        queries: MatrixView<'_>,
        k: usize,
        range_start: usize,
        range_end: usize,
        device: DeviceType,
    ) -> IndexResult<SearchResults> {
        if k == 0 {
            return Err(IndexError::InvalidK { k });
        }
        let candidates = self.store.slice(range_start, range_end)?;
        if queries.dim() != self.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension(),
                actual: queries.dim(),
            });
        }

        debug!(
            "Query {} rows, k={}, range=[{}, {}), device={}",
            queries.rows(),
            k,
            range_start,
            range_end,
            device
        );

        let backend = select_backend(device, self.manager)?;
        if candidates.is_empty() {
            return Ok(SearchResults::empty(queries.rows()));
        }

        let scores = backend.compute_scores(queries, candidates, self.metric())?;

        let first_id = VectorId::from(range_start);
        let k_eff = k.min(candidates.rows());
        let rows = (0..scores.rows())
            .map(|i| self.selector.select_range(scores.row(i), k_eff, first_id))
            .collect::<IndexResult<Vec<_>>>()?;

        Ok(SearchResults::from_rows(k_eff, rows))
    }

    /// Top-k search against every stored row.
    pub fn query(
        &self,
        queries: MatrixView<'_>,
        k: usize,
        device: DeviceType,
    ) -> IndexResult<SearchResults> {
        self.query_range(queries, k, 0, self.len(), device)
    }

    /// Copy the stored vector with the given id.
    ///
    /// # Errors
    ///
    /// Returns `RangeError` if `id` has not been assigned.
    pub fn reconstruct(&self, id: VectorId) -> IndexResult<Vec<f32>> {
        self.store
            .get(id)
            .map(|row| row.to_vec())
            .ok_or_else(|| {
                let start = id.as_index();
                IndexError::range(start, start.saturating_add(1), self.len())
            })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn metric(&self) -> MetricType {
        self.config.metric
    }

    /// The half-precision storage flag given at construction.
    pub fn float16_storage(&self) -> bool {
        self.config.float16_storage
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The borrowed compute manager, if any.
    pub fn compute_manager(&self) -> Option<&'m ComputeManager> {
        self.manager
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &VectorStore {
        &self.store
    }
}

/// Rescale every row of `vectors` to unit L2 norm on the chosen backend.
///
/// After renormalization, inner-product search ranks by cosine similarity.
///
/// # Errors
///
/// - `CapacityError` if `dim` is zero
/// - `Compute` if `vectors` is not a whole number of rows
/// - `BackendUnavailable` if `GpuCompute` is requested without a compute manager
pub fn normalize_l2(
    vectors: &mut [f32],
    dim: usize,
    device: DeviceType,
    manager: Option<&ComputeManager>,
) -> IndexResult<()> {
    if dim == 0 {
        return Err(IndexError::capacity("dimension must be positive"));
    }
    let backend = select_backend(device, manager)?;
    backend.normalize_l2(vectors, dim)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
