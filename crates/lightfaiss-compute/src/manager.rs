//! Compute manager: the handle to accelerator resources.
//!
//! A [`ComputeManager`] owns the tensor-runtime device that the `GpuCompute`
//! backend uploads buffers to and dispatches pipelines on. It is created and
//! dropped by the surrounding application; indexes only ever borrow it.

use candle_core::{Device, Tensor};
use tracing::{debug, info, warn};

use crate::config::ComputeConfig;
use crate::device::{DevicePreference, DeviceType};
use crate::error::{ComputeError, ComputeResult};
use crate::matrix::MatrixView;

/// Handle to the device used by accelerator pipelines.
#[derive(Debug, Clone)]
pub struct ComputeManager {
    device: Device,
    preference: DevicePreference,
}

impl ComputeManager {
    /// Create a compute manager from configuration.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if `gpu` is requested and no accelerator
    /// can be opened.
    pub fn new(config: &ComputeConfig) -> ComputeResult<Self> {
        let device = Self::select_device(config)?;
        info!(
            "Compute manager ready (preference={}, device={})",
            config.device,
            describe(&device)
        );
        Ok(Self {
            device,
            preference: config.device,
        })
    }

    /// A manager that runs pipelines on the host device.
    pub fn cpu() -> Self {
        Self {
            device: Device::Cpu,
            preference: DevicePreference::Cpu,
        }
    }

    /// The underlying tensor-runtime device.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The preference this manager was created with.
    pub fn preference(&self) -> DevicePreference {
        self.preference
    }

    /// Whether pipelines run on dedicated accelerator hardware.
    pub fn is_accelerated(&self) -> bool {
        !self.device.is_cpu()
    }

    /// Short name of the bound device ("cpu", "cuda", "metal").
    pub fn device_name(&self) -> &'static str {
        describe(&self.device)
    }

    /// Copy a host matrix into a device-resident `(rows, dim)` tensor.
    pub fn upload(&self, matrix: MatrixView<'_>) -> ComputeResult<Tensor> {
        Ok(Tensor::from_slice(
            matrix.as_slice(),
            (matrix.rows(), matrix.dim()),
            &self.device,
        )?)
    }

    /// Block until all work queued on the device has completed.
    pub fn synchronize(&self) -> ComputeResult<()> {
        self.device.synchronize()?;
        Ok(())
    }

    fn select_device(config: &ComputeConfig) -> ComputeResult<Device> {
        if config.device == DevicePreference::Cpu {
            return Ok(Device::Cpu);
        }

        match (Self::open_accelerator(config.ordinal), config.device) {
            (Some(device), _) => Ok(device),
            (None, DevicePreference::Gpu) => {
                warn!("GPU requested but no accelerator could be opened");
                Err(ComputeError::backend_unavailable(
                    DeviceType::GpuCompute,
                    Self::unavailable_reason(config.ordinal),
                ))
            }
            (None, _) => {
                info!("No accelerator found, score pipelines run on the host device");
                Ok(Device::Cpu)
            }
        }
    }

    /// Accelerator kinds compiled into this build, in the order they are tried.
    #[allow(clippy::type_complexity)]
    fn accelerators() -> Vec<(&'static str, fn(usize) -> candle_core::Result<Device>)> {
        #[allow(unused_mut)]
        let mut openers: Vec<(&'static str, fn(usize) -> candle_core::Result<Device>)> =
            Vec::new();
        #[cfg(feature = "metal")]
        openers.push(("metal", Device::new_metal));
        #[cfg(feature = "cuda")]
        openers.push(("cuda", Device::new_cuda));
        openers
    }

    /// Open the first compiled accelerator that has a device at `ordinal`.
    fn open_accelerator(ordinal: usize) -> Option<Device> {
        Self::accelerators()
            .into_iter()
            .find_map(|(name, open)| match open(ordinal) {
                Ok(device) => {
                    info!("Score pipelines bound to {} device {}", name, ordinal);
                    Some(device)
                }
                Err(e) => {
                    debug!("Cannot open {} device {}: {}", name, ordinal, e);
                    None
                }
            })
    }

    fn unavailable_reason(ordinal: usize) -> String {
        let compiled: Vec<&str> = Self::accelerators()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        if compiled.is_empty() {
            "score pipelines were built for the host only; \
             rebuild with --features metal or --features cuda to dispatch them on a GPU"
                .to_string()
        } else {
            format!(
                "no {} device at ordinal {} could be opened for score pipelines",
                compiled.join(" or "),
                ordinal
            )
        }
    }
}

fn describe(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}

// ============================================================================
// Tests
// ============================================================================
