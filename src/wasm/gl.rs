use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::error::StartupError;
use crate::gl::{Gl, Stage};

pub fn context(canvas: &HtmlCanvasElement) -> Result<GL, StartupError> {
    canvas
        .get_context("webgl2")
        .map_err(|_| StartupError::NoGlContext)?
        .ok_or(StartupError::NoGlContext)?
        .dyn_into::<GL>()
        .map_err(|_| StartupError::NoGlContext)
}

impl Gl for GL {
    type Program = WebGlProgram;
    type Shader = WebGlShader;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_program(&self) -> Option<WebGlProgram> {
        GL::create_program(self)
    }

    fn delete_program(&self, program: &WebGlProgram) {
        GL::delete_program(self, Some(program));
    }

    fn attached_shaders(&self, program: &WebGlProgram) -> Vec<WebGlShader> {
        self.get_attached_shaders(program)
            .map(|shaders| {
                shaders
                    .iter()
                    .filter_map(|value| value.dyn_into::<WebGlShader>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        GL::attach_shader(self, program, shader);
    }

    fn detach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        GL::detach_shader(self, program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        GL::link_program(self, program);
    }

    fn link_status(&self, program: &WebGlProgram) -> bool {
        self.get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> String {
        self.get_program_info_log(program).unwrap_or_default()
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        GL::use_program(self, program);
    }

    fn create_shader(&self, stage: Stage) -> Option<WebGlShader> {
        let kind = match stage {
            Stage::Vertex => GL::VERTEX_SHADER,
            Stage::Fragment => GL::FRAGMENT_SHADER,
        };
        GL::create_shader(self, kind)
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        GL::shader_source(self, shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        GL::compile_shader(self, shader);
    }

    fn compile_status(&self, shader: &WebGlShader) -> bool {
        self.get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> String {
        self.get_shader_info_log(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        GL::delete_shader(self, Some(shader));
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        self.get_attrib_location(program, name)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        GL::create_buffer(self)
    }

    fn delete_buffer(&self, buffer: &WebGlBuffer) {
        GL::delete_buffer(self, Some(buffer));
    }

    fn upload_static(&self, buffer: &WebGlBuffer, data: &[f32]) {
        self.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        let view = Float32Array::from(data);
        self.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    }

    fn bind_array_buffer(&self, buffer: Option<&WebGlBuffer>) {
        self.bind_buffer(GL::ARRAY_BUFFER, buffer);
    }

    fn float_attrib_array(&self, index: u32, components: i32) {
        self.vertex_attrib_pointer_with_i32(index, components, GL::FLOAT, false, 0, 0);
        self.enable_vertex_attrib_array(index);
    }

    fn clear(&self, color: [f32; 4], depth: f32) {
        let [r, g, b, a] = color;
        self.clear_color(r, g, b, a);
        self.clear_depth(depth);
        self.enable(GL::DEPTH_TEST);
        self.depth_func(GL::LEQUAL);
        GL::clear(self, GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    fn uniform_matrix4(&self, location: &WebGlUniformLocation, columns: &[f32; 16]) {
        self.uniform_matrix4fv_with_f32_array(Some(location), false, columns);
    }

    fn uniform_f32(&self, location: &WebGlUniformLocation, value: f32) {
        self.uniform1f(Some(location), value);
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.draw_arrays(GL::TRIANGLE_STRIP, first, count);
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            self.drawing_buffer_width().max(0) as u32,
            self.drawing_buffer_height().max(0) as u32,
        )
    }
}
