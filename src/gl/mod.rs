//! The slice of the GL API the editor drives.
//!
//! Everything above this module talks to the GPU through [`Gl`]. The browser
//! build implements it for `WebGl2RenderingContext`; tests use
//! [`fake::FakeGl`].

use std::fmt;

#[cfg(test)]
pub(crate) mod fake;

/// One of the two shader compilation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// GL calls used by the program builder and the quad renderer.
///
/// Methods take `&self` like the WebGL bindings do; GL objects are plain
/// handles owned by whoever created them and must be released explicitly.
pub trait Gl {
    type Program: Clone;
    type Shader;
    type Buffer;
    type UniformLocation;

    fn create_program(&self) -> Option<Self::Program>;
    fn delete_program(&self, program: &Self::Program);
    fn attached_shaders(&self, program: &Self::Program) -> Vec<Self::Shader>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn detach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> String;
    fn use_program(&self, program: Option<&Self::Program>);

    fn create_shader(&self, stage: Stage) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> String;
    fn delete_shader(&self, shader: &Self::Shader);

    /// Raw attribute location; negative when the linker dropped or never saw it.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> i32;
    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Self::UniformLocation>;

    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn delete_buffer(&self, buffer: &Self::Buffer);
    /// Binds `buffer` to `ARRAY_BUFFER` and fills it with `STATIC_DRAW` data.
    fn upload_static(&self, buffer: &Self::Buffer, data: &[f32]);
    fn bind_array_buffer(&self, buffer: Option<&Self::Buffer>);
    /// Points attribute `index` at the bound array buffer as tightly packed floats.
    fn float_attrib_array(&self, index: u32, components: i32);

    /// Clears color and depth with depth testing enabled (`LEQUAL`).
    fn clear(&self, color: [f32; 4], depth: f32);
    fn uniform_matrix4(&self, location: &Self::UniformLocation, columns: &[f32; 16]);
    fn uniform_f32(&self, location: &Self::UniformLocation, value: f32);
    fn draw_triangle_strip(&self, first: i32, count: i32);

    /// Drawing buffer size in pixels.
    fn drawing_buffer_size(&self) -> (u32, u32);
}
