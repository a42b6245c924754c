//! Compute-side views of GL-owned memory.
//!
//! The GL object stays owned by the graphics side. A [`SharedMem`] is a
//! borrowed view that must be acquired before the kernel touches it and
//! released before GL reads it again.

use gl::types::GLuint;
use ocl::core::{GlTextureTarget, ImageDescriptor};
use ocl::enums::MemObjectType;
use ocl::flags::MemFlags;
use ocl::{Buffer, Image, Queue};
use tracer_core::{ResourceKind, Result, TracerError};
use tracing::debug;

/// Target of the 2-D textures the GL side allocates for sharing.
const TEXTURE_TARGET: GlTextureTarget = GlTextureTarget::GlTexture2d;

/// Compute-side handle on a shared GL texture or buffer.
pub enum SharedMem {
    Texture(Image<u8>),
    Buffer(Buffer<f32>),
}

impl SharedMem {
    /// Wrap a GL 2-D texture (RGBA8, single level) as a write-only image.
    pub fn from_gl_texture(
        queue: &Queue,
        texture: GLuint,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let desc = ImageDescriptor::new(
            MemObjectType::Image2d,
            width as usize,
            height as usize,
            1,
            0,
            0,
            0,
            None,
        );
        let image = Image::<u8>::from_gl_texture(
            queue,
            MemFlags::new().write_only(),
            desc,
            TEXTURE_TARGET,
            0,
            texture,
        )
        .map_err(|e| TracerError::interop(format!("image from GL texture {texture}: {e}")))?;

        debug!(texture, width, height, "wrapped GL texture");
        Ok(Self::Texture(image))
    }

    /// Wrap a GL vertex buffer as a read-write buffer of floats.
    pub fn from_gl_buffer(queue: &Queue, buffer: GLuint) -> Result<Self> {
        let buf = Buffer::<f32>::from_gl_buffer(queue, Some(MemFlags::new().read_write()), buffer)
            .map_err(|e| TracerError::interop(format!("buffer from GL buffer {buffer}: {e}")))?;

        debug!(buffer, len = buf.len(), "wrapped GL buffer");
        Ok(Self::Buffer(buf))
    }

    /// Wrap whichever GL object `kind` names.
    pub fn from_gl(
        queue: &Queue,
        kind: ResourceKind,
        gl_name: GLuint,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        match kind {
            ResourceKind::Texture => Self::from_gl_texture(queue, gl_name, width, height),
            ResourceKind::VertexBuffer => Self::from_gl_buffer(queue, gl_name),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Texture(_) => ResourceKind::Texture,
            Self::Buffer(_) => ResourceKind::VertexBuffer,
        }
    }

    /// Enqueue the GL-to-CL ownership transfer.
    pub fn acquire(&self) -> Result<()> {
        let res = match self {
            Self::Texture(image) => image.cmd().gl_acquire().enq(),
            Self::Buffer(buf) => buf.cmd().gl_acquire().enq(),
        };
        res.map_err(|e| TracerError::compute(format!("acquire GL object: {e}")))
    }

    /// Enqueue the CL-to-GL ownership transfer.
    pub fn release(&self) -> Result<()> {
        let res = match self {
            Self::Texture(image) => image.cmd().gl_release().enq(),
            Self::Buffer(buf) => buf.cmd().gl_release().enq(),
        };
        res.map_err(|e| TracerError::compute(format!("release GL object: {e}")))
    }
}
