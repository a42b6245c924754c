//! Polling the OpenGL error queue.

use gl::types::GLenum;
use tracer_core::{Result, TracerError};

use crate::gl_backend;

/// Upper bound on queue entries drained in one call. Some drivers keep
/// reporting `GL_CONTEXT_LOST` forever.
const MAX_DRAINED: usize = 32;

/// Human-readable name of a `glGetError` code.
pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "GL_UNKNOWN_ERROR",
    }
}

/// Drain and return every pending GL error code.
pub fn drain_gl_errors() -> Vec<GLenum> {
    if !gl_backend::is_loaded() {
        return Vec::new();
    }
    let mut errors = Vec::new();
    while errors.len() < MAX_DRAINED {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            break;
        }
        errors.push(code);
    }
    errors
}

/// Drain the error queue, logging every entry. Fails if anything was pending.
pub fn check_gl(stage: &str) -> Result<()> {
    let errors = drain_gl_errors();
    if errors.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = errors.iter().map(|&e| error_name(e)).collect();
    tracing::warn!(stage, errors = ?names, "OpenGL errors");
    Err(TracerError::graphics(format!("{stage}: {}", names.join(", "))))
}

/// Drain the error queue, logging every entry without failing.
pub fn log_gl_errors(stage: &str) {
    if let Err(err) = check_gl(stage) {
        tracing::debug!("ignoring: {err}");
    }
}
