//! # lightfaiss-core
//!
//! Exact (flat) nearest-neighbor search over an append-only vector store.
//!
//! The index keeps every vector in one contiguous buffer and answers top-k
//! queries by scoring each query against a contiguous range of stored rows on
//! a backend chosen per call. Results carry global store ids, so callers can
//! search a store in sub-ranges and merge the partial results themselves.
//!
//! ## Modules
//!
//! - [`store`]: fixed-capacity row storage and id assignment
//! - [`topk`]: metric-aware top-k selection with id tie-breaking
//! - [`index`]: the [`FlatIndex`] orchestrator
//! - [`config`]: index and engine configuration (YAML)
//! - [`errors`]: the [`IndexError`] type
//!
//! ## Usage
//!
//! ```ignore
//! use lightfaiss_core::{DeviceType, FlatIndex, IndexConfig, MatrixView, MetricType};
//!
//! let mut index = FlatIndex::new(IndexConfig::new(2, 10), None)?;
//! index.add(MatrixView::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2)?)?;
//!
//! let results = index.query_range(MatrixView::new(&[1.0, 2.0], 2)?, 2, 0, 3, DeviceType::CpuBlas)?;
//! assert_eq!(results.distances(), &[17.0, 11.0]);
//! ```

pub mod config;
pub mod errors;
pub mod index;
pub mod store;
pub mod topk;
pub mod types;

pub use config::{EngineConfig, IndexConfig};
pub use errors::{IndexError, IndexResult};
pub use index::{normalize_l2, FlatIndex};
pub use store::VectorStore;
pub use topk::TopKSelector;
pub use types::{Neighbor, SearchResults, VectorId};

// Compute vocabulary used in the index API
pub use lightfaiss_compute::{
    select_backend, ComputeBackend, ComputeConfig, ComputeError, ComputeManager, DevicePreference,
    DeviceType, MatrixView, MetricType,
};
