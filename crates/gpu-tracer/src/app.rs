//! Application context and the winit event handler.
//!
//! Everything the demo owns lives in [`AppContext`], created once the event
//! loop is running and a GL context can exist. Field order is drop order: the
//! compute-side view of the shared surface goes before the surface itself.

use anyhow::{Context as _, Result};
use cl_interop::{select_gl_sharing_device, InteropCompute, SharedContext};
use tracer_core::{FrameDriver, FrameRateCounter, TracerConfig};
use tracer_glium::{GlWindow, Presenter, SharedSurface};
use tracing::info;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

pub struct AppContext {
    compute: InteropCompute,
    presenter: Presenter,
    driver: FrameDriver,
    fps: FrameRateCounter,
    gl: GlWindow,
    cfg: TracerConfig,
}

impl AppContext {
    /// Open the window, pick the interop device and set up the shared
    /// surface and kernel. Any failure here is fatal.
    pub fn init(event_loop: &ActiveEventLoop, cfg: TracerConfig) -> Result<Self> {
        let gl = GlWindow::open(event_loop, &cfg)?;

        let selection = select_gl_sharing_device(&cfg.extension)?;
        let shared_ctx = SharedContext::create(&selection)?;

        let surface = SharedSurface::create(&gl.display, cfg.resource, cfg.width, cfg.height)
            .context("creating shared GL surface")?;
        let gl_name = surface.gl_name();
        let presenter = Presenter::new(&gl.display, surface)?;

        let compute = InteropCompute::new(shared_ctx, &cfg, gl_name)?;

        Ok(Self {
            compute,
            presenter,
            driver: FrameDriver::new(cfg.width, cfg.height, cfg.phase_step),
            fps: FrameRateCounter::new(cfg.fps_interval),
            gl,
            cfg,
        })
    }

    /// Run one frame and refresh the frame-rate readout.
    pub fn render(&mut self) -> Result<()> {
        if let Some(fps) = self.fps.tick() {
            self.gl.set_title(&self.cfg.fps_title(fps));
        }

        self.driver
            .run_frame(&mut self.compute, &mut self.presenter)
            .with_context(|| format!("frame {}", self.driver.frame() + 1))
    }

    pub fn request_redraw(&self) {
        self.gl.request_redraw();
    }
}

/// winit handler; records the first fatal error for `main` to report.
pub struct TracerApp {
    cfg: TracerConfig,
    ctx: Option<AppContext>,
    failure: Option<anyhow::Error>,
}

impl TracerApp {
    pub fn new(cfg: TracerConfig) -> Self {
        Self {
            cfg,
            ctx: None,
            failure: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.failure.get_or_insert(err);
        // Release GPU resources before the loop winds down.
        self.ctx = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for TracerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() || self.failure.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        match AppContext::init(event_loop, self.cfg.clone()) {
            Ok(ctx) => {
                info!("initialised, entering render loop");
                self.ctx = Some(ctx);
            }
            Err(err) => self.fail(event_loop, err.context("startup failed")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("window closed");
                self.ctx = None;
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(ctx) = self.ctx.as_mut() else {
                    return;
                };
                if let Err(err) = ctx.render() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ctx) = self.ctx.as_ref() {
            ctx.request_redraw();
        }
    }
}
