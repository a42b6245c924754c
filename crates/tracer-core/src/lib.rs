//! Backend-agnostic core of the GPU ray tracer demo.
//!
//! Nothing here talks to OpenCL or OpenGL directly. The interop crate
//! implements [`InteropProbe`] and [`ComputeStage`] over OpenCL, the glium
//! crate implements [`PresentStage`], and the binary wires them together.
//!
//! - [`select_interop_device`] picks the CL platform/device pair that can
//!   share memory with GL.
//! - [`FrameDriver`] runs the acquire/dispatch/release/finish/draw sequence.
//! - [`FrameRateCounter`] feeds the window title readout.
//! - [`TracerConfig`] holds the compiled-in settings.

pub mod config;
pub mod error;
pub mod fps;
pub mod frame;
pub mod kernel_source;
pub mod select;

pub use config::{ResourceKind, TracerConfig};
pub use error::{Result, TracerError};
pub use fps::FrameRateCounter;
pub use frame::{ComputeStage, FrameDriver, PresentStage};
pub use kernel_source::load_kernel_source;
pub use select::{
    has_extension, report_platforms, select_interop_device, InteropProbe, PlatformReport,
    Selection,
};
