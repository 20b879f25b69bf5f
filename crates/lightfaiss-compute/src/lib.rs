//! # lightfaiss-compute
//!
//! Compute layer for LightFaiss - metrics and interchangeable score backends.
//!
//! This crate knows nothing about indexes. It turns a block of query rows and a
//! block of candidate rows into a score matrix, either on the host with dense
//! linear algebra or through a tensor pipeline on an accelerator.
//!
//! ## Architecture
//!
//! ```text
//! lightfaiss-core (FlatIndex, VectorStore, TopKSelector)
//!        ↓  DeviceType per call
//! lightfaiss-compute
//!   ├── CpuBlasBackend      (ndarray gemm on the calling thread)
//!   └── GpuComputeBackend   (candle tensors on a borrowed ComputeManager)
//! ```
//!
//! ## Features
//!
//! - `metal`: Metal kernels for the accelerator pipeline (macOS)
//! - `cuda`: CUDA kernels for the accelerator pipeline (NVIDIA)
//!
//! Without either feature the accelerator pipeline runs on the host device.
//!
//! ## Usage
//!
//! ```ignore
//! use lightfaiss_compute::{select_backend, ComputeManager, DeviceType, MatrixView, MetricType};
//!
//! let manager = ComputeManager::cpu();
//! let backend = select_backend(DeviceType::GpuCompute, Some(&manager))?;
//! let scores = backend.compute_scores(queries, candidates, MetricType::InnerProduct)?;
//! ```

pub mod backend;
pub mod config;
pub mod device;
pub mod error;
pub mod manager;
pub mod matrix;
pub mod metric;
pub mod norms;

pub use backend::{
    available_backends, select_backend, ComputeBackend, CpuBlasBackend, GpuComputeBackend,
};
pub use config::ComputeConfig;
pub use device::{DevicePreference, DeviceType};
pub use error::{ComputeError, ComputeResult};
pub use manager::ComputeManager;
pub use matrix::{MatrixView, ScoreMatrix};
pub use metric::{inner_product, l2_squared, MetricType};
pub use norms::{norm_l2_squared, norms_l2_squared, renormalize_l2};
