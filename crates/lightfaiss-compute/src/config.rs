//! Configuration for the compute manager.

use serde::{Deserialize, Serialize};

use crate::device::DevicePreference;

/// Configuration used to build a [`ComputeManager`](crate::ComputeManager).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeConfig {
    /// Device preference.
    #[serde(default)]
    pub device: DevicePreference,

    /// Accelerator ordinal when more than one is present.
    #[serde(default)]
    pub ordinal: usize,
}

impl ComputeConfig {
    /// Create a config with the given device preference.
    pub fn new(device: DevicePreference) -> Self {
        Self { device, ordinal: 0 }
    }

    /// Set the accelerator ordinal.
    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }
}
