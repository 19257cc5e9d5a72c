use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlVertexArrayObject,
};

use super::dom;
use super::frame::AnimationLoop;
use crate::effect::Effect;
use crate::error::{DeckError, Result};
use crate::globe::{sphere_points, AXIAL_TILT, SPIN_PER_FRAME};

const POINTS: usize = 4_000;

const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
uniform float u_angle;
uniform float u_tilt;
uniform float u_aspect;
uniform float u_point_size;
out float v_depth;

void main() {
    float c = cos(u_angle);
    float s = sin(u_angle);
    vec3 p = vec3(c * a_position.x + s * a_position.z, a_position.y, -s * a_position.x + c * a_position.z);
    float ct = cos(u_tilt);
    float st = sin(u_tilt);
    p = vec3(p.x, ct * p.y - st * p.z, st * p.y + ct * p.z);
    v_depth = p.z;

    vec2 xy = p.xy * 0.8;
    if (u_aspect > 1.0) {
        xy.x /= u_aspect;
    } else {
        xy.y *= u_aspect;
    }
    gl_Position = vec4(xy, -p.z * 0.5, 1.0);
    gl_PointSize = u_point_size * (1.2 + p.z);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in float v_depth;
out vec4 color;

void main() {
    vec2 d = gl_PointCoord - 0.5;
    if (dot(d, d) > 0.25) {
        discard;
    }
    float front = smoothstep(-1.0, 1.0, v_depth);
    color = vec4(mix(vec3(0.0, 0.32, 0.4), vec3(0.0, 0.83, 1.0), front), 0.35 + 0.65 * front);
}
"#;

/// Slowly spinning point-cloud Earth drawn with WebGL2.
pub struct Globe {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    buffer: WebGlBuffer,
    vao: WebGlVertexArrayObject,
    anim: AnimationLoop,
}

impl Globe {
    pub fn mount(container: &Element) -> Result<Self> {
        let canvas = dom::overlay_canvas(container, "globe-canvas")?;
        Self::build(canvas.clone()).inspect_err(|_| canvas.remove())
    }

    fn build(canvas: HtmlCanvasElement) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or_else(|| DeckError::unavailable("WebGL2 not supported"))?
            .dyn_into()
            .map_err(|_| DeckError::unavailable("webgl2 context has unexpected type"))?;

        let program = link_program(&gl)?;
        let points = sphere_points(POINTS);
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| DeckError::unavailable("vertex buffer"))?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| DeckError::unavailable("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(points.as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);
        let position = gl.get_attrib_location(&program, "a_position");
        if position < 0 {
            return Err(DeckError::unavailable("a_position attribute missing"));
        }
        gl.enable_vertex_attrib_array(position as u32);
        gl.vertex_attrib_pointer_with_i32(position as u32, 3, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let anim = {
            let gl = gl.clone();
            let canvas = canvas.clone();
            let program = program.clone();
            let vao = vao.clone();
            let u_angle = gl.get_uniform_location(&program, "u_angle");
            let u_tilt = gl.get_uniform_location(&program, "u_tilt");
            let u_aspect = gl.get_uniform_location(&program, "u_aspect");
            let u_point_size = gl.get_uniform_location(&program, "u_point_size");
            let angle = Rc::new(Cell::new(0.0_f32));
            AnimationLoop::new(move |_now| {
                let ratio = dom::fit_canvas(&canvas);
                let (w, h) = (canvas.width() as i32, canvas.height() as i32);
                gl.viewport(0, 0, w, h);

                angle.set(angle.get() + SPIN_PER_FRAME);
                gl.clear_color(0.0, 0.0, 0.0, 0.0);
                gl.clear(GL::COLOR_BUFFER_BIT);
                gl.enable(GL::BLEND);
                gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

                gl.use_program(Some(&program));
                gl.uniform1f(u_angle.as_ref(), angle.get());
                gl.uniform1f(u_tilt.as_ref(), AXIAL_TILT);
                gl.uniform1f(u_aspect.as_ref(), w as f32 / h.max(1) as f32);
                gl.uniform1f(u_point_size.as_ref(), 2.0 * ratio as f32);
                gl.bind_vertex_array(Some(&vao));
                gl.draw_arrays(GL::POINTS, 0, POINTS as i32);
                gl.bind_vertex_array(None);
                true
            })
        };

        Ok(Self { canvas, gl, program, buffer, vao, anim })
    }
}

impl Effect for Globe {
    fn start(&mut self) -> Result<()> {
        if self.gl.is_context_lost() {
            return Err(DeckError::unavailable("webgl2 context lost"));
        }
        self.anim.start()
    }

    fn stop(&mut self) -> Result<()> {
        self.anim.stop();
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.anim.dispose();
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_buffer(Some(&self.buffer));
        self.gl.delete_program(Some(&self.program));
        self.canvas.remove();
        Ok(())
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| DeckError::unavailable("shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(DeckError::unavailable(format!("shader compile: {log}")))
    }
}

fn link_program(gl: &GL) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
    let program = gl
        .create_program()
        .ok_or_else(|| DeckError::unavailable("program object"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);
    // shaders are no longer needed once linked
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(DeckError::unavailable(format!("program link: {log}")))
    }
}
