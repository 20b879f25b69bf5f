//! Configuration types for lightfaiss-core.
//!
//! [`IndexConfig`] carries the construction parameters of a [`FlatIndex`]
//! (fixed for the index lifetime). [`EngineConfig`] bundles it with the
//! [`ComputeConfig`] used to build a compute manager, and is what gets loaded
//! from YAML:
//!
//! ```yaml
//! index:
//!   dimension: 384
//!   capacity: 100000
//!   metric: l2_squared
//! compute:
//!   device: auto
//! ```
//!
//! [`FlatIndex`]: crate::FlatIndex

use std::fs;
use std::path::Path;

use lightfaiss_compute::{ComputeConfig, DevicePreference, MetricType};
use serde::{Deserialize, Serialize};

use crate::errors::{IndexError, IndexResult};

/// Number of stored floats above which validation warns about memory use.
pub const LARGE_STORE_FLOATS: usize = 1 << 30;

// ============================================================================
// IndexConfig
// ============================================================================

/// Construction parameters of a flat index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Dimension of every stored vector.
    pub dimension: usize,

    /// Maximum number of vectors; storage is allocated up front.
    pub capacity: usize,

    /// Metric used to score and order candidates.
    #[serde(default)]
    pub metric: MetricType,

    /// Half-precision storage flag accepted at construction.
    ///
    /// Recorded and reported only; vectors are always stored as `f32`.
    #[serde(default)]
    pub float16_storage: bool,
}

impl IndexConfig {
    /// Create a new config with required fields.
    pub fn new(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            capacity,
            metric: MetricType::default(),
            float16_storage: false,
        }
    }

    /// Set the metric.
    pub fn with_metric(mut self, metric: MetricType) -> Self {
        self.metric = metric;
        self
    }

    /// Set the half-precision storage flag.
    pub fn with_float16_storage(mut self, enabled: bool) -> Self {
        self.float16_storage = enabled;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CapacityError` if the dimension or capacity is zero.
    ///
    /// # Warnings
    ///
    /// Non-fatal issues are returned as strings for the caller to log.
    pub fn validate(&self) -> IndexResult<Vec<String>> {
        if self.dimension == 0 {
            return Err(IndexError::capacity("dimension must be positive"));
        }
        if self.capacity == 0 {
            return Err(IndexError::capacity("capacity must be positive"));
        }

        let mut warnings = Vec::new();
        if self.float16_storage {
            warnings.push(
                "float16Storage is recorded but vectors are stored as f32".to_string(),
            );
        }
        if self.dimension.saturating_mul(self.capacity) > LARGE_STORE_FLOATS {
            warnings.push(format!(
                "index reserves {} x {} floats up front",
                self.capacity, self.dimension
            ));
        }
        Ok(warnings)
    }
}

// ============================================================================
// EngineConfig
// ============================================================================

/// Index and compute configuration loaded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Index construction parameters.
    pub index: IndexConfig,

    /// Compute manager settings.
    #[serde(default)]
    pub compute: ComputeConfig,
}

impl EngineConfig {
    pub fn new(index: IndexConfig) -> Self {
        Self {
            index,
            compute: ComputeConfig::default(),
        }
    }

    /// Set the compute config.
    pub fn with_compute(mut self, compute: ComputeConfig) -> Self {
        self.compute = compute;
        self
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Yaml` if it cannot be parsed,
    /// and `CapacityError` or `InvalidConfiguration` if validation fails.
    pub fn from_path(path: &Path) -> IndexResult<Self> {
        tracing::debug!("Loading engine config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> IndexResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;

        // Validate configuration and log warnings
        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the index section and its consistency with the compute section.
    ///
    /// # Errors
    ///
    /// - `CapacityError` if the index dimension or capacity is zero
    /// - `InvalidConfiguration` if a device ordinal is set while the host device is forced
    pub fn validate(&self) -> IndexResult<Vec<String>> {
        let warnings = self.index.validate()?;

        if self.compute.device == DevicePreference::Cpu && self.compute.ordinal != 0 {
            return Err(IndexError::invalid_configuration(
                format!(
                    "compute.ordinal is {} but compute.device is cpu",
                    self.compute.ordinal
                ),
                "Remove compute.ordinal or set compute.device to gpu or auto",
            ));
        }

        Ok(warnings)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> IndexResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
