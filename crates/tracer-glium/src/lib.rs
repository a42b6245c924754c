//! OpenGL side of the GPU ray tracer, built on glium.
//!
//! [`GlWindow::open`] creates the window and its GL context. The context must
//! exist and be current before the OpenCL context is created, because the
//! compute side shares memory with it. [`SharedSurface`] allocates the
//! GL-owned texture or vertex buffer that the kernel writes, and [`Presenter`]
//! draws it each frame.
//!
//! ### Warning
//!
//! A few GL calls bypass glium (texture parameters, the error queue). Their
//! bindings are saved and restored around each use so glium's state cache
//! stays correct.

use std::num::NonZeroU32;

use glium::glutin::config::ConfigTemplateBuilder;
use glium::glutin::context::ContextAttributesBuilder;
use glium::glutin::display::GetGlDisplay;
use glium::glutin::prelude::*;
use glium::glutin::surface::{SurfaceAttributesBuilder, WindowSurface};
use glium::CapabilitiesSource;
use glutin_winit::DisplayBuilder;
use tracer_core::{Result, TracerConfig, TracerError};
use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowAttributes};

mod gl_backend;
pub mod glsl;
pub mod present;
pub mod surface;
pub mod validate_gl;

pub use present::Presenter;
pub use surface::{SharedSurface, SharedVertex};

/// The glium display type for a winit window surface.
pub type TracerDisplay = glium::Display<WindowSurface>;

/// A window with a current OpenGL context.
///
/// The display is dropped before the window its surface was created on.
pub struct GlWindow {
    pub display: TracerDisplay,
    pub window: Window,
}

impl GlWindow {
    /// Create a fixed-size window and make its GL context current.
    ///
    /// Every backend step (config, context, surface, make-current) is
    /// reported as [`TracerError::Graphics`].
    pub fn open(event_loop: &ActiveEventLoop, cfg: &TracerConfig) -> Result<Self> {
        let builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes(cfg)));
        let (window, gl_config) = builder
            .build(event_loop, ConfigTemplateBuilder::new(), |configs| {
                // glutin reports an empty match as an error before calling us.
                configs
                    .reduce(|best, c| {
                        if c.num_samples() > best.num_samples() {
                            c
                        } else {
                            best
                        }
                    })
                    .expect("GL config list is never empty")
            })
            .map_err(|e| TracerError::graphics(format!("GL display: {e}")))?;
        let window = window.ok_or_else(|| TracerError::graphics("no window was created"))?;

        let raw = window
            .window_handle()
            .map_err(|e| TracerError::graphics(format!("window handle: {e}")))?
            .as_raw();
        let (width, height) = surface_size(window.inner_size())?;
        let surface_attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw, width, height);
        let context_attrs = ContextAttributesBuilder::new().build(Some(raw));

        let gl_display = gl_config.display();
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs) }
            .map_err(|e| TracerError::graphics(format!("window surface: {e}")))?;
        let context = unsafe { gl_display.create_context(&gl_config, &context_attrs) }
            .map_err(|e| TracerError::graphics(format!("GL context: {e}")))?
            .make_current(&surface)
            .map_err(|e| TracerError::graphics(format!("make context current: {e}")))?;
        let display = glium::Display::from_context_surface(context, surface)
            .map_err(|e| TracerError::graphics(format!("glium display: {e}")))?;

        gl_backend::ensure_loaded();

        let gl = Self { display, window };
        gl.log_info();
        Ok(gl)
    }

    /// Log the monitor and GL driver the demo is running on.
    pub fn log_info(&self) {
        if let Some(monitor) = self.window.primary_monitor() {
            let name = monitor.name().unwrap_or_else(|| "unknown monitor".to_string());
            let refresh_hz = monitor.refresh_rate_millihertz().map(|mhz| mhz / 1000);
            info!(monitor = %name, ?refresh_hz, "primary monitor");
        }

        info!("Renderer: {}", self.display.get_opengl_renderer_string());
        info!(
            "OpenGL version supported {}",
            self.display.get_opengl_version_string()
        );

        let versions = &self.display.get_capabilities().supported_glsl_versions;
        debug!("GLSL versions: {versions:?}");
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn window_attributes(cfg: &TracerConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(&cfg.title)
        .with_inner_size(PhysicalSize::new(cfg.width, cfg.height))
        .with_resizable(false)
}

/// Window size as the non-zero extent a GL surface needs.
fn surface_size(size: PhysicalSize<u32>) -> Result<(NonZeroU32, NonZeroU32)> {
    match (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(TracerError::graphics(format!(
            "window has zero extent {}x{}",
            size.width, size.height
        ))),
    }
}
