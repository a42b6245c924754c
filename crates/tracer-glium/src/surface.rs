//! GL-owned storage that the kernel writes into.
//!
//! The GL side allocates and owns the object for its whole lifetime. The
//! compute side only ever holds a view created from [`SharedSurface::gl_name`],
//! and that view must be dropped before the surface.

use gl::types::{GLint, GLuint};
use glium::texture::{MipmapsOption, Texture2d, UncompressedFloatFormat};
use glium::{implement_vertex, GlObject, VertexBuffer};
use tracer_core::{ResourceKind, Result, TracerError};
use tracing::debug;

use crate::validate_gl::check_gl;
use crate::TracerDisplay;

/// One element of the shared vertex buffer, written by the kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedVertex {
    pub position: [f32; 4],
}

implement_vertex!(SharedVertex, position);

/// A texture or vertex buffer shared with the compute side.
pub enum SharedSurface {
    Texture(Texture2d),
    Vertices(VertexBuffer<SharedVertex>),
}

impl SharedSurface {
    /// Allocate the GL object for `kind` at `width` x `height`.
    pub fn create(
        display: &TracerDisplay,
        kind: ResourceKind,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let surface = match kind {
            ResourceKind::Texture => Self::Texture(create_texture(display, width, height)?),
            ResourceKind::VertexBuffer => {
                let count = width as usize * height as usize;
                let vb = VertexBuffer::<SharedVertex>::empty_dynamic(display, count)
                    .map_err(|e| TracerError::graphics(format!("vertex buffer: {e}")))?;
                Self::Vertices(vb)
            }
        };
        check_gl("shared surface creation")?;
        debug!(
            kind = ?surface.kind(),
            gl_name = surface.gl_name(),
            width,
            height,
            "shared surface created"
        );
        Ok(surface)
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Texture(_) => ResourceKind::Texture,
            Self::Vertices(_) => ResourceKind::VertexBuffer,
        }
    }

    /// GL object name, used to create the compute-side view.
    pub fn gl_name(&self) -> GLuint {
        match self {
            Self::Texture(tex) => tex.get_id(),
            Self::Vertices(vb) => vb.get_id(),
        }
    }
}

/// Create an RGBA8 texture with a single level and nearest filtering.
///
/// The compute API rejects textures whose minification filter expects
/// mipmaps, so the texture object's own parameters are set here rather than
/// relying on a sampler at draw time.
fn create_texture(display: &TracerDisplay, width: u32, height: u32) -> Result<Texture2d> {
    let texture = Texture2d::empty_with_format(
        display,
        UncompressedFloatFormat::U8U8U8U8,
        MipmapsOption::NoMipmap,
        width,
        height,
    )
    .map_err(|e| TracerError::graphics(format!("texture: {e}")))?;

    unsafe {
        let mut bound: GLint = 0;
        gl::GetIntegerv(gl::TEXTURE_BINDING_2D, &mut bound);

        gl::BindTexture(gl::TEXTURE_2D, texture.get_id());
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);

        gl::BindTexture(gl::TEXTURE_2D, bound as GLuint);
    }

    Ok(texture)
}
