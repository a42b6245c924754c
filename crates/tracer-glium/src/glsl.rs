//! Presentation shaders for the two GLSL dialects the demo supports.

/// GLSL dialects the presentation shaders are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    Glsl120,
    Glsl140,
}

/// Vertex and fragment source for a textured fullscreen quad.
pub fn quad_shaders(version: GlslVersion) -> (&'static str, &'static str) {
    match version {
        GlslVersion::Glsl140 => (
            r#"
            #version 140
            in vec2 position;
            in vec2 tex_coords;
            out vec2 v_tex_coords;
            void main() {
                v_tex_coords = tex_coords;
                gl_Position = vec4(position, 0.0, 1.0);
            }
            "#,
            r#"
            #version 140
            in vec2 v_tex_coords;
            out vec4 color;
            uniform sampler2D tex;
            void main() {
                color = texture(tex, v_tex_coords);
            }
            "#,
        ),
        GlslVersion::Glsl120 => (
            r#"
            #version 120
            attribute vec2 position;
            attribute vec2 tex_coords;
            varying vec2 v_tex_coords;
            void main() {
                v_tex_coords = tex_coords;
                gl_Position = vec4(position, 0.0, 1.0);
            }
            "#,
            r#"
            #version 120
            varying vec2 v_tex_coords;
            uniform sampler2D tex;
            void main() {
                gl_FragColor = texture2D(tex, v_tex_coords);
            }
            "#,
        ),
    }
}

/// Vertex and fragment source for drawing the shared vertex buffer as points.
///
/// Each vertex is `(x, y, z, w)` in clip space as written by the kernel.
pub fn point_shaders(version: GlslVersion) -> (&'static str, &'static str) {
    match version {
        GlslVersion::Glsl140 => (
            r#"
            #version 140
            in vec4 position;
            out float v_depth;
            void main() {
                v_depth = position.z;
                gl_Position = vec4(position.xy, 0.0, 1.0);
            }
            "#,
            r#"
            #version 140
            in float v_depth;
            out vec4 color;
            void main() {
                color = vec4(1.0, 1.0 - abs(v_depth), 0.5, 1.0);
            }
            "#,
        ),
        GlslVersion::Glsl120 => (
            r#"
            #version 120
            attribute vec4 position;
            varying float v_depth;
            void main() {
                v_depth = position.z;
                gl_Position = vec4(position.xy, 0.0, 1.0);
            }
            "#,
            r#"
            #version 120
            varying float v_depth;
            void main() {
                gl_FragColor = vec4(1.0, 1.0 - abs(v_depth), 0.5, 1.0);
            }
            "#,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shader_declares_its_dialect() {
        for (version, tag) in [
            (GlslVersion::Glsl140, "#version 140"),
            (GlslVersion::Glsl120, "#version 120"),
        ] {
            let (qv, qf) = quad_shaders(version);
            let (pv, pf) = point_shaders(version);
            for src in [qv, qf, pv, pf] {
                assert_eq!(src.trim_start().lines().next(), Some(tag));
            }
        }
    }
}
