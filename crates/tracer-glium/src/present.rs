//! Drawing the shared surface to the window.

use glium::index::{NoIndices, PrimitiveType};
use glium::uniforms::{MagnifySamplerFilter, MinifySamplerFilter};
use glium::{
    implement_vertex, uniform, Api, CapabilitiesSource, Program, Surface, Version, VertexBuffer,
};
use tracer_core::{PresentStage, Result, TracerError};
use tracing::trace;

use crate::glsl::{point_shaders, quad_shaders, GlslVersion};
use crate::surface::SharedSurface;
use crate::validate_gl::log_gl_errors;
use crate::TracerDisplay;

#[derive(Debug, Clone, Copy)]
struct QuadVertex {
    position: [f32; 2],
    tex_coords: [f32; 2],
}

implement_vertex!(QuadVertex, position, tex_coords);

/// Fullscreen quad in triangle-strip order. Texture row 0 is at the bottom.
const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0],
        tex_coords: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        tex_coords: [1.0, 0.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        tex_coords: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        tex_coords: [1.0, 1.0],
    },
];

/// Draws the shared surface: a textured quad or a point cloud.
pub struct Presenter {
    display: TracerDisplay,
    program: Program,
    quad: VertexBuffer<QuadVertex>,
    surface: SharedSurface,
}

impl Presenter {
    pub fn new(display: &TracerDisplay, surface: SharedSurface) -> Result<Self> {
        let supported = &display.get_capabilities().supported_glsl_versions;
        let version = if supported.contains(&Version(Api::Gl, 1, 4)) {
            GlslVersion::Glsl140
        } else if supported.contains(&Version(Api::Gl, 1, 2)) {
            GlslVersion::Glsl120
        } else {
            return Err(TracerError::graphics("neither GLSL 1.40 nor 1.20 is supported"));
        };

        let (vertex, fragment) = match surface {
            SharedSurface::Texture(_) => quad_shaders(version),
            SharedSurface::Vertices(_) => point_shaders(version),
        };
        let program = Program::from_source(display, vertex, fragment, None)
            .map_err(|e| TracerError::graphics(format!("presentation program: {e}")))?;
        let quad = VertexBuffer::new(display, &FULLSCREEN_QUAD)
            .map_err(|e| TracerError::graphics(format!("quad vertex buffer: {e}")))?;

        trace!(?version, "presenter ready");
        Ok(Self {
            display: display.clone(),
            program,
            quad,
            surface,
        })
    }
}

impl PresentStage for Presenter {
    fn draw(&mut self) -> Result<()> {
        let mut frame = self.display.draw();
        frame.clear_color_and_depth((0.0, 0.0, 0.0, 1.0), 1.0);

        let drawn = match &self.surface {
            SharedSurface::Texture(texture) => {
                let uniforms = uniform! {
                    tex: texture
                        .sampled()
                        .magnify_filter(MagnifySamplerFilter::Nearest)
                        .minify_filter(MinifySamplerFilter::Nearest),
                };
                frame.draw(
                    &self.quad,
                    NoIndices(PrimitiveType::TriangleStrip),
                    &self.program,
                    &uniforms,
                    &Default::default(),
                )
            }
            SharedSurface::Vertices(vertices) => frame.draw(
                vertices,
                NoIndices(PrimitiveType::Points),
                &self.program,
                &glium::uniforms::EmptyUniforms,
                &Default::default(),
            ),
        };

        // The frame has to be finished even when the draw call failed.
        let finished = frame.finish();
        drawn.map_err(|e| TracerError::graphics(format!("draw: {e}")))?;
        finished.map_err(|e| TracerError::graphics(format!("swap buffers: {e}")))?;

        log_gl_errors("draw");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.display.finish();
        Ok(())
    }
}
