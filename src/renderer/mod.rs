// src/renderer/mod.rs

//! The fixed-scene renderer.
//!
//! Owns the EGL context and the GL objects for the one scene this program
//! draws: a shader pair compiled from embedded source and a static
//! three-vertex buffer. Per frame it clears, draws, and presents; nothing
//! about the scene changes after construction.

use anyhow::{anyhow, Context as _, Result};
use glow::HasContext;
use log::{debug, info};
use std::ffi::c_void;

use crate::config::Config;

pub mod egl;

use egl::EglContext;

const VERTEX_SHADER_SOURCE: &str = "\
attribute vec2 pos;
void main() {
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

const FRAGMENT_SHADER_SOURCE: &str = "\
precision mediump float;
uniform vec4 fill_color;
void main() {
    gl_FragColor = fill_color;
}
";

/// One triangle, clip-space 2D positions.
const VERTICES: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];

pub struct Renderer {
    egl: EglContext,
    gl: glow::Context,
    program: glow::Program,
    vbo: glow::Buffer,
    clear_color: [f32; 4],
}

impl Renderer {
    /// Creates the EGL context against the native window, loads GL, and
    /// uploads the static scene.
    pub fn new(
        native_display: *mut c_void,
        native_window: *mut c_void,
        config: &Config,
    ) -> Result<Self> {
        let egl = EglContext::new(native_display, native_window)?;

        // SAFETY: the EGL context is current on this thread and stays so for
        // the lifetime of the renderer.
        let gl = unsafe { glow::Context::from_loader_function(|name| egl.get_proc_address(name)) };

        let (program, vbo) = unsafe { setup_scene(&gl, config.colors.fill)? };
        info!("Shader program linked and vertex buffer uploaded.");

        Ok(Renderer {
            egl,
            gl,
            program,
            vbo,
            clear_color: config.colors.clear,
        })
    }

    /// Draws the frame: viewport to the current surface size, clear, one
    /// draw call. Output depends only on the window size.
    pub fn draw(&self, width: u32, height: u32) -> Result<()> {
        let gl = &self.gl;
        unsafe {
            gl.viewport(0, 0, width as i32, height as i32);
            let [r, g, b, a] = self.clear_color;
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
        }
        Ok(())
    }

    /// Presents the frame to the compositor.
    pub fn present(&self) -> Result<()> {
        self.egl.swap_buffers()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        debug!("Deleting GL scene objects.");
        // The EGL context is still current here; it is torn down when the
        // `egl` field drops after this body.
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_program(self.program);
        }
    }
}

/// Compiles the shader pair, links the program, uploads the vertex buffer,
/// and wires the single attribute. Everything here is create-once state.
unsafe fn setup_scene(gl: &glow::Context, fill: [f32; 4]) -> Result<(glow::Program, glow::Buffer)> {
    let vertex_shader = compile_shader(gl, glow::VERTEX_SHADER, VERTEX_SHADER_SOURCE)
        .context("vertex shader compilation failed")?;
    let fragment_shader = compile_shader(gl, glow::FRAGMENT_SHADER, FRAGMENT_SHADER_SOURCE)
        .context("fragment shader compilation failed")?;

    let program = gl
        .create_program()
        .map_err(|e| anyhow!("failed to create a shader program: {}", e))?;
    gl.attach_shader(program, vertex_shader);
    gl.attach_shader(program, fragment_shader);
    gl.link_program(program);
    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(anyhow!("program link failed:\n{}", log));
    }
    // The program keeps the compiled shaders alive; the handles can go.
    gl.delete_shader(vertex_shader);
    gl.delete_shader(fragment_shader);

    gl.use_program(Some(program));

    let fill_location = gl
        .get_uniform_location(program, "fill_color")
        .ok_or_else(|| anyhow!("fill_color uniform not found in the linked program"))?;
    gl.uniform_4_f32(Some(&fill_location), fill[0], fill[1], fill[2], fill[3]);

    let vbo = gl
        .create_buffer()
        .map_err(|e| anyhow!("failed to create the vertex buffer: {}", e))?;
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
    gl.buffer_data_u8_slice(
        glow::ARRAY_BUFFER,
        bytemuck::cast_slice(&VERTICES),
        glow::STATIC_DRAW,
    );

    let pos_location = gl
        .get_attrib_location(program, "pos")
        .ok_or_else(|| anyhow!("pos attribute not found in the linked program"))?;
    gl.enable_vertex_attrib_array(pos_location);
    gl.vertex_attrib_pointer_f32(pos_location, 2, glow::FLOAT, false, 0, 0);

    Ok((program, vbo))
}

unsafe fn compile_shader(gl: &glow::Context, kind: u32, source: &str) -> Result<glow::Shader> {
    let shader = gl
        .create_shader(kind)
        .map_err(|e| anyhow!("failed to create a shader object: {}", e))?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(anyhow!("shader compilation failed:\n{}", log));
    }
    Ok(shader)
}

#[cfg(test)]
mod tests {
    use super::*;

    // GL itself needs a live context, but the embedded sources are plain
    // data worth pinning down.
    #[test]
    fn shader_sources_declare_expected_interface() {
        assert!(VERTEX_SHADER_SOURCE.contains("attribute vec2 pos"));
        assert!(FRAGMENT_SHADER_SOURCE.contains("uniform vec4 fill_color"));
        assert!(FRAGMENT_SHADER_SOURCE.contains("precision mediump float"));
    }

    #[test]
    fn triangle_geometry_is_three_2d_vertices() {
        assert_eq!(VERTICES.len(), 6);
        // All positions stay inside clip space.
        assert!(VERTICES.iter().all(|c| c.abs() <= 1.0));
    }
}
