//! [`InteropProbe`] over the installed OpenCL platforms.

use ocl::enums::{DeviceInfo, PlatformInfo};
use ocl::flags::DeviceType;
use ocl::{Device, Platform};
use tracer_core::{InteropProbe, PlatformReport, Result, TracerError};

/// Queries the OpenCL ICD loader for platforms and GPU devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct OclProbe;

impl OclProbe {
    pub fn new() -> Self {
        Self
    }

    fn platform_attr(platform: Platform, kind: PlatformInfo) -> Result<String> {
        platform
            .info(kind)
            .map(|info| info.to_string())
            .map_err(|e| TracerError::probe(format!("platform {kind:?}: {e}")))
    }
}

impl InteropProbe for OclProbe {
    type Platform = Platform;
    type Device = Device;

    fn platforms(&self) -> Result<Vec<Platform>> {
        let ids = ocl::core::get_platform_ids()
            .map_err(|e| TracerError::probe(format!("platform list: {e}")))?;
        Ok(ids.into_iter().map(Platform::new).collect())
    }

    fn platform_extensions(&self, platform: Platform) -> Result<String> {
        Self::platform_attr(platform, PlatformInfo::Extensions)
    }

    fn gpu_devices(&self, platform: Platform) -> Result<Vec<Device>> {
        Device::list(platform, Some(DeviceType::GPU))
            .map_err(|e| TracerError::probe(format!("GPU device list: {e}")))
    }

    fn device_extensions(&self, device: Device) -> Result<String> {
        device
            .info(DeviceInfo::Extensions)
            .map(|info| info.to_string())
            .map_err(|e| TracerError::probe(format!("device extensions: {e}")))
    }

    fn platform_report(&self, platform: Platform) -> Result<PlatformReport> {
        Ok(PlatformReport {
            name: Self::platform_attr(platform, PlatformInfo::Name)?,
            vendor: Self::platform_attr(platform, PlatformInfo::Vendor)?,
            version: Self::platform_attr(platform, PlatformInfo::Version)?,
            profile: Self::platform_attr(platform, PlatformInfo::Profile)?,
            extensions: Self::platform_attr(platform, PlatformInfo::Extensions)?,
        })
    }
}

/// Device name for log lines; falls back to the handle's debug form.
pub fn device_label(device: Device) -> String {
    device.name().unwrap_or_else(|_| format!("{device:?}"))
}
