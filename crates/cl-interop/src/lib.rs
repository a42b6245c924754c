//! OpenCL side of the GPU ray tracer, built on `ocl`.
//!
//! - [`OclProbe`] lists platforms and GPU devices for the interop matcher.
//! - [`SharedContext`] is a CL context created against the current GL
//!   context, with one command queue.
//! - [`SharedMem`] wraps a GL texture or buffer as CL memory.
//! - [`InteropCompute`] builds the kernel and runs the compute half of each
//!   frame.
//!
//! [`select_gl_sharing_device`] ties the probe to the matcher and logs the
//! platform listing on the way.

pub mod compute;
pub mod context;
pub mod probe;
pub mod shared;

pub use compute::{build_program, InteropCompute};
pub use context::SharedContext;
pub use probe::OclProbe;
pub use shared::SharedMem;

use anyhow::{Context as _, Result};
use ocl::{Device, Platform};
use tracer_core::{report_platforms, select_interop_device, Selection};
use tracing::info;

/// Print every platform's attributes, then pick the first platform/device
/// pair that supports `extension`.
pub fn select_gl_sharing_device(extension: &str) -> Result<Selection<Platform, Device>> {
    let probe = OclProbe::new();

    let reports = report_platforms(&probe).context("listing OpenCL platforms")?;
    for (i, report) in reports.iter().enumerate() {
        info!("\n{}", report.listing(i));
    }

    let selection = select_interop_device(&probe, extension)?;
    info!(
        "Found compatible platform {} and device {}",
        selection.platform_index, selection.device_index
    );
    Ok(selection)
}
