// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Minimal OpenGL presenter: one shader program, one fullscreen quad, one
//! texture the offscreen surface is uploaded into every swap. The surface
//! stores row 0 at the bottom, which is also GL's texture origin, so the
//! upload needs no flip.

use crate::error::CanvasError;
use glow::HasContext;

const BLIT_VERTEX_SRC: &str = r#"
    precision highp float;

    layout(location = 0) in vec2 aPos;
    layout(location = 1) in vec2 aTexCoord;

    out vec2 TexCoord;

    void main()
    {
        TexCoord = aTexCoord;
        gl_Position = vec4(aPos, 0.0, 1.0);
    }
"#;

const BLIT_FRAGMENT_SRC: &str = r#"
    precision highp float;

    out vec4 FragColor;
    in vec2 TexCoord;

    uniform sampler2D frame;

    void main()
    {
        FragColor = texture(frame, TexCoord);
    }
"#;

pub struct GlBlit {
    program: glow::Program,
    vao: glow::VertexArray,
    buffers: [glow::Buffer; 2],
    texture: glow::Texture,
    tex_w: i32,
    tex_h: i32,
}

impl GlBlit {
    pub fn new(
        gl: &glow::Context,
        ver: &str,
        tex_w: u32,
        tex_h: u32,
        linear: bool,
    ) -> Result<Self, CanvasError> {
        let program = compile_program(gl, ver, BLIT_VERTEX_SRC, BLIT_FRAGMENT_SRC)?;

        let vertices: [f32; 16] = [
            // positions  // texCoords
            -1.0, -1.0, 0.0, 0.0, //
            1.0, -1.0, 1.0, 0.0, //
            1.0, 1.0, 1.0, 1.0, //
            -1.0, 1.0, 0.0, 1.0,
        ];
        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(CanvasError::Backend)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(CanvasError::Backend)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                vertices.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );

            let ebo = gl.create_buffer().map_err(CanvasError::Backend)?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                indices.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );

            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 16, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, 16, 8);

            gl.bind_vertex_array(None);

            let filter = if linear { glow::LINEAR } else { glow::NEAREST } as i32;
            let texture = gl.create_texture().map_err(CanvasError::Backend)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                tex_w as i32,
                tex_h as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                program,
                vao,
                buffers: [vbo, ebo],
                texture,
                tex_w: tex_w as i32,
                tex_h: tex_h as i32,
            })
        }
    }

    /// Upload the frame and draw it over the whole window.
    pub fn draw(&self, gl: &glow::Context, frame: &[u8], win_w: i32, win_h: i32) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, win_w, win_h);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program));
            gl.bind_vertex_array(Some(self.vao));

            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                0,
                0,
                self.tex_w,
                self.tex_h,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(frame)),
            );
            let loc = gl.get_uniform_location(self.program, "frame");
            gl.uniform_1_i32(loc.as_ref(), 0);

            gl.draw_elements(glow::TRIANGLES, 6, glow::UNSIGNED_INT, 0);
            gl.bind_vertex_array(None);
        }
    }

    pub fn cleanup(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_texture(self.texture);
            gl.delete_vertex_array(self.vao);
            for b in self.buffers {
                gl.delete_buffer(b);
            }
            gl.delete_program(self.program);
        }
    }
}

fn compile_program(
    gl: &glow::Context,
    ver: &str,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<glow::Program, CanvasError> {
    unsafe {
        let vertex_shader = gl.create_shader(glow::VERTEX_SHADER).map_err(CanvasError::Backend)?;
        gl.shader_source(vertex_shader, &format!("{}\n{}", ver, vertex_source));
        gl.compile_shader(vertex_shader);
        if !gl.get_shader_compile_status(vertex_shader) {
            return Err(CanvasError::Backend(format!(
                "vertex shader compilation error: {}",
                gl.get_shader_info_log(vertex_shader)
            )));
        }

        let fragment_shader = gl.create_shader(glow::FRAGMENT_SHADER).map_err(CanvasError::Backend)?;
        gl.shader_source(fragment_shader, &format!("{}\n{}", ver, fragment_source));
        gl.compile_shader(fragment_shader);
        if !gl.get_shader_compile_status(fragment_shader) {
            return Err(CanvasError::Backend(format!(
                "fragment shader compilation error: {}",
                gl.get_shader_info_log(fragment_shader)
            )));
        }

        let program = gl.create_program().map_err(CanvasError::Backend)?;
        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            return Err(CanvasError::Backend(format!(
                "program linking error: {}",
                gl.get_program_info_log(program)
            )));
        }
        gl.detach_shader(program, vertex_shader);
        gl.detach_shader(program, fragment_shader);
        gl.delete_shader(vertex_shader);
        gl.delete_shader(fragment_shader);

        Ok(program)
    }
}
