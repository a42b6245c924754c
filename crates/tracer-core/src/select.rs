//! Platform/device selection for CL/GL interop.
//!
//! [`select_interop_device`] walks every compute platform in enumeration
//! order, keeps the ones whose extension list carries the interop token, and
//! returns the first GPU device on such a platform that carries it too.

use std::fmt;

use tracing::debug;

use crate::error::{Result, TracerError};

/// Read-only view of a compute runtime's platforms and devices.
///
/// Implemented over `ocl` by the interop crate and by mocks in tests.
pub trait InteropProbe {
    type Platform: Copy + fmt::Debug;
    type Device: Copy + fmt::Debug;

    /// All platforms, in the runtime's enumeration order.
    fn platforms(&self) -> Result<Vec<Self::Platform>>;

    /// Space-delimited extension string of a platform.
    fn platform_extensions(&self, platform: Self::Platform) -> Result<String>;

    /// GPU-class devices of a platform, in enumeration order.
    fn gpu_devices(&self, platform: Self::Platform) -> Result<Vec<Self::Device>>;

    /// Space-delimited extension string of a device.
    fn device_extensions(&self, device: Self::Device) -> Result<String>;

    /// Descriptive attributes of a platform for the startup listing.
    fn platform_report(&self, platform: Self::Platform) -> Result<PlatformReport>;
}

/// The pair chosen by [`select_interop_device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<P, D> {
    pub platform: P,
    pub device: D,
    pub platform_index: usize,
    pub device_index: usize,
}

/// Attributes printed for each platform at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformReport {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub profile: String,
    pub extensions: String,
}

impl PlatformReport {
    fn attributes(&self) -> [(&'static str, &str); 5] {
        [
            ("Name", &self.name),
            ("Vendor", &self.vendor),
            ("Version", &self.version),
            ("Profile", &self.profile),
            ("Extensions", &self.extensions),
        ]
    }

    /// Multi-line listing, numbered from `index` (zero-based).
    pub fn listing(&self, index: usize) -> String {
        let mut out = format!("{}. Platform\n", index + 1);
        for (j, (label, value)) in self.attributes().iter().enumerate() {
            out.push_str(&format!("  {}.{} {label:<11}: {value}\n", index + 1, j + 1));
        }
        out
    }
}

/// Whether a space-delimited extension string lists `token` as an entry.
pub fn has_extension(extensions: &str, token: &str) -> bool {
    extensions.split_whitespace().any(|ext| ext == token)
}

/// Collect a report for every platform.
pub fn report_platforms<I: InteropProbe>(probe: &I) -> Result<Vec<PlatformReport>> {
    probe
        .platforms()?
        .into_iter()
        .map(|platform| probe.platform_report(platform))
        .collect()
}

/// Return the first platform/device pair that both advertise `extension`.
///
/// Platforms are scanned in ascending index order and devices within a
/// platform likewise; only GPU devices are considered.
pub fn select_interop_device<I: InteropProbe>(
    probe: &I,
    extension: &str,
) -> Result<Selection<I::Platform, I::Device>> {
    let platforms = probe.platforms()?;

    for (platform_index, &platform) in platforms.iter().enumerate() {
        let platform_ext = probe.platform_extensions(platform)?;
        if !has_extension(&platform_ext, extension) {
            debug!(platform_index, ?platform, "platform lacks {extension}");
            continue;
        }

        let devices = probe.gpu_devices(platform)?;
        debug!(platform_index, devices = devices.len(), "checking platform");

        for (device_index, &device) in devices.iter().enumerate() {
            let device_ext = probe.device_extensions(device)?;
            if device_ext.is_empty() {
                continue;
            }
            if has_extension(&device_ext, extension) {
                debug!(
                    platform_index,
                    device_index, "found compatible platform and device"
                );
                return Ok(Selection {
                    platform,
                    device,
                    platform_index,
                    device_index,
                });
            }
        }
    }

    Err(TracerError::NoCompatibleDevice {
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const TOKEN: &str = "cl_khr_gl_sharing";

    struct MockPlatform {
        extensions: &'static str,
        devices: Vec<&'static str>,
    }

    #[derive(Default)]
    struct MockProbe {
        platforms: Vec<MockPlatform>,
        fail_devices_of: Option<usize>,
        device_queries: Cell<usize>,
    }

    impl MockProbe {
        fn with(platforms: Vec<MockPlatform>) -> Self {
            Self {
                platforms,
                ..Default::default()
            }
        }
    }

    fn platform(extensions: &'static str, devices: &[&'static str]) -> MockPlatform {
        MockPlatform {
            extensions,
            devices: devices.to_vec(),
        }
    }

    impl InteropProbe for MockProbe {
        type Platform = usize;
        type Device = (usize, usize);

        fn platforms(&self) -> Result<Vec<usize>> {
            Ok((0..self.platforms.len()).collect())
        }

        fn platform_extensions(&self, p: usize) -> Result<String> {
            Ok(self.platforms[p].extensions.to_string())
        }

        fn gpu_devices(&self, p: usize) -> Result<Vec<(usize, usize)>> {
            if self.fail_devices_of == Some(p) {
                return Err(TracerError::probe("device list unavailable"));
            }
            Ok((0..self.platforms[p].devices.len()).map(|d| (p, d)).collect())
        }

        fn device_extensions(&self, (p, d): (usize, usize)) -> Result<String> {
            self.device_queries.set(self.device_queries.get() + 1);
            Ok(self.platforms[p].devices[d].to_string())
        }

        fn platform_report(&self, p: usize) -> Result<PlatformReport> {
            Ok(PlatformReport {
                name: format!("Mock {p}"),
                extensions: self.platforms[p].extensions.to_string(),
                ..Default::default()
            })
        }
    }

    #[test]
    fn no_platform_with_token_reports_no_device() {
        let probe = MockProbe::with(vec![
            platform("cl_khr_fp64", &["cl_khr_gl_sharing"]),
            platform("", &[]),
        ]);
        let err = select_interop_device(&probe, TOKEN).unwrap_err();
        assert!(matches!(
            err,
            TracerError::NoCompatibleDevice { ref extension } if extension == TOKEN
        ));
        assert_eq!(probe.device_queries.get(), 0);
    }

    #[test]
    fn empty_runtime_reports_no_device() {
        let probe = MockProbe::with(vec![]);
        assert!(matches!(
            select_interop_device(&probe, TOKEN),
            Err(TracerError::NoCompatibleDevice { .. })
        ));
    }

    #[test]
    fn single_qualifying_pair_is_returned() {
        let probe = MockProbe::with(vec![
            platform("cl_khr_icd", &["cl_khr_gl_sharing"]),
            platform(
                "cl_khr_icd cl_khr_gl_sharing",
                &["cl_khr_fp64", "cl_khr_fp64 cl_khr_gl_sharing"],
            ),
        ]);
        let sel = select_interop_device(&probe, TOKEN).unwrap();
        assert_eq!(sel.platform, 1);
        assert_eq!(sel.device, (1, 1));
        assert_eq!((sel.platform_index, sel.device_index), (1, 1));
    }

    #[test]
    fn first_pair_in_enumeration_order_wins() {
        let probe = MockProbe::with(vec![
            platform("cl_khr_gl_sharing", &["", "cl_khr_gl_sharing", "cl_khr_gl_sharing"]),
            platform("cl_khr_gl_sharing", &["cl_khr_gl_sharing"]),
        ]);
        let sel = select_interop_device(&probe, TOKEN).unwrap();
        assert_eq!(sel.device, (0, 1));
        // Stops at the first hit instead of scanning the rest.
        assert_eq!(probe.device_queries.get(), 2);
    }

    #[test]
    fn device_must_carry_token_itself() {
        let probe = MockProbe::with(vec![platform("cl_khr_gl_sharing", &["cl_khr_fp64"])]);
        assert!(matches!(
            select_interop_device(&probe, TOKEN),
            Err(TracerError::NoCompatibleDevice { .. })
        ));
    }

    #[test]
    fn token_match_is_exact_entry() {
        assert!(has_extension("cl_khr_icd  cl_khr_gl_sharing\n", TOKEN));
        assert!(!has_extension("cl_khr_gl_sharing_ext", TOKEN));
        assert!(!has_extension("", TOKEN));
    }

    #[test]
    fn probe_errors_propagate() {
        let mut probe = MockProbe::with(vec![platform(
            "cl_khr_gl_sharing",
            &["cl_khr_gl_sharing"],
        )]);
        probe.fail_devices_of = Some(0);
        assert!(matches!(
            select_interop_device(&probe, TOKEN),
            Err(TracerError::Probe(_))
        ));
    }

    #[test]
    fn listing_numbers_attributes() {
        let probe = MockProbe::with(vec![platform("cl_khr_gl_sharing", &[])]);
        let reports = report_platforms(&probe).unwrap();
        let text = reports[0].listing(0);
        assert!(text.starts_with("1. Platform\n"));
        assert!(text.contains("  1.1 Name       : Mock 0\n"));
        assert!(text.contains("  1.5 Extensions : cl_khr_gl_sharing\n"));
    }
}
