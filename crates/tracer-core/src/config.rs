//! Compiled-in settings for the tracer demo.
//!
//! There is no configuration file and no command line. Everything the
//! application needs to start is described by [`TracerConfig::default`].

use std::path::PathBuf;

/// Interop extension required from both the platform and the device.
#[cfg(target_os = "macos")]
pub const GL_SHARING_EXTENSION: &str = "cl_APPLE_gl_sharing";

/// Interop extension required from both the platform and the device.
#[cfg(not(target_os = "macos"))]
pub const GL_SHARING_EXTENSION: &str = "cl_khr_gl_sharing";

/// Upper bound on the kernel source read from disk.
pub const MAX_SOURCE_SIZE: usize = 0x10_0000;

/// Which GL object the kernel writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceKind {
    /// RGBA8 texture drawn as a fullscreen quad.
    #[default]
    Texture,
    /// Vertex buffer of `width * height` four-float vertices drawn as points.
    VertexBuffer,
}

#[derive(Debug, Clone)]
pub struct TracerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub kernel_path: PathBuf,
    pub kernel_name: String,
    pub extension: String,
    pub resource: ResourceKind,
    pub max_source_size: usize,
    /// Added to the kernel's animation argument once per frame.
    pub phase_step: f32,
    /// Minimum interval between window title refreshes, in seconds.
    pub fps_interval: f64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "GPU Ray Tracer".to_string(),
            kernel_path: PathBuf::from("./trace.cl"),
            kernel_name: "sine_wave".to_string(),
            extension: GL_SHARING_EXTENSION.to_string(),
            resource: ResourceKind::Texture,
            max_source_size: MAX_SOURCE_SIZE,
            phase_step: 0.01,
            fps_interval: 1.0,
        }
    }
}

impl TracerConfig {
    /// Title shown while the frame-rate readout is active.
    pub fn fps_title(&self, fps: f64) -> String {
        format!("{} ({fps:.1} FPS)", self.title)
    }
}
