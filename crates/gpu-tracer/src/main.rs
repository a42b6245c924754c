//! GPU ray tracer demo.
//!
//! Opens a window, shares a GL texture with an OpenCL device that supports
//! GL sharing, and runs the `./trace.cl` kernel into it every frame.
//!
//! Exits with status 1 if the kernel cannot be loaded or either backend fails
//! to initialise, and 0 when the window is closed.

mod app;

use std::process::ExitCode;

use anyhow::Result;
use tracer_core::TracerConfig;
use tracing::error;
use winit::event_loop::EventLoop;

use crate::app::TracerApp;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn run() -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = TracerApp::new(TracerConfig::default());
    event_loop.run_app(&mut app)?;

    match app.take_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
