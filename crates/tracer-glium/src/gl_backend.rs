//! Raw OpenGL entry points alongside glium.
//!
//! glium owns the context, but a few queries (the error queue) go through the
//! raw `gl` bindings. Their function pointers are resolved from the system GL
//! library the first time a context is current.

use std::sync::Once;

static GL_INIT_ONCE: Once = Once::new();

/// Load raw GL function pointers exactly once via `gl_loader`.
///
/// Must be called with the window's GL context current.
pub(crate) fn ensure_loaded() {
    GL_INIT_ONCE.call_once(|| {
        gl_loader::init_gl();
        gl::load_with(|s| gl_loader::get_proc_address(s).cast());
        tracing::debug!("raw GL entry points loaded");
    });
}

pub(crate) fn is_loaded() -> bool {
    GL_INIT_ONCE.is_completed()
}
