//! Device selection types.
//!
//! [`DeviceType`] picks the backend for a single query call. [`DevicePreference`]
//! picks the hardware a [`ComputeManager`](crate::ComputeManager) binds to.

use serde::{Deserialize, Serialize};

// ============================================================================
// DeviceType
// ============================================================================

/// Backend used to compute a score matrix.
///
/// Chosen per call; the same index can be queried on either backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Dense linear algebra on the host.
    CpuBlas,
    /// Tensor pipeline dispatched through a [`ComputeManager`](crate::ComputeManager).
    GpuCompute,
}

impl DeviceType {
    /// Get the device type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::CpuBlas => "cpu_blas",
            DeviceType::GpuCompute => "gpu_compute",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu_blas" | "cpu" | "blas" => Ok(Self::CpuBlas),
            "gpu_compute" | "gpu" | "compute" => Ok(Self::GpuCompute),
            _ => Err(format!(
                "Unknown device type: '{}'. Use 'cpu_blas' or 'gpu_compute'.",
                s
            )),
        }
    }
}

// ============================================================================
// DevicePreference
// ============================================================================

/// Preference for the hardware behind a compute manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Auto-select best device (GPU if available, else host).
    #[default]
    Auto,
    /// Force GPU (Metal on macOS, CUDA on Linux).
    Gpu,
    /// Run the pipeline on the host device.
    Cpu,
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Gpu => write!(f, "gpu"),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

impl std::str::FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gpu" | "metal" | "cuda" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            _ => Err(format!(
                "Unknown device: '{}'. Use 'auto', 'gpu', or 'cpu'.",
                s
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
