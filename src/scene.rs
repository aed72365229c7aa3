//! The quad, its transforms, and the per-frame draw.

use glam::{Mat4, Vec3};

use crate::builder::LinkedProgram;
use crate::error::BuildError;
use crate::gl::Gl;

/// Unit quad corners as a triangle strip.
pub const QUAD_POSITIONS: [f32; 8] = [-1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0];

/// White, red, green, blue.
pub const QUAD_COLORS: [f32; 16] = [
    1.0, 1.0, 1.0, 1.0, //
    1.0, 0.0, 0.0, 1.0, //
    0.0, 1.0, 0.0, 1.0, //
    0.0, 0.0, 1.0, 1.0,
];

pub const QUAD_VERTICES: i32 = 4;

const FIELD_OF_VIEW_DEG: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const CAMERA_DISTANCE: f32 = 6.0;

/// OpenGL-convention perspective projection for a drawing buffer of
/// `width` x `height`. A zero height is treated as square.
pub fn projection(width: u32, height: u32) -> Mat4 {
    let aspect = if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    };
    Mat4::perspective_rh_gl(FIELD_OF_VIEW_DEG.to_radians(), aspect, Z_NEAR, Z_FAR)
}

pub fn model_view() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
}

/// Per-frame inputs that do not come from the program.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    pub clear_color: [f32; 4],
    /// Seconds since the first drawn frame.
    pub elapsed: f32,
    pub upload_time: bool,
}

/// Position and color buffers, uploaded once and never written again.
pub struct Quad<G: Gl> {
    position: G::Buffer,
    color: G::Buffer,
}

impl<G: Gl> Quad<G> {
    pub fn upload(gl: &G) -> Result<Self, BuildError> {
        let position = gl
            .create_buffer()
            .ok_or(BuildError::Allocation("position buffer"))?;
        gl.upload_static(&position, &QUAD_POSITIONS);
        let Some(color) = gl.create_buffer() else {
            gl.delete_buffer(&position);
            return Err(BuildError::Allocation("color buffer"));
        };
        gl.upload_static(&color, &QUAD_COLORS);
        gl.bind_array_buffer(None);
        Ok(Self { position, color })
    }

    /// Draws one frame with `program`. Inputs the program does not use are
    /// skipped.
    pub fn draw(&self, gl: &G, program: &LinkedProgram<G>, inputs: &FrameInputs) {
        gl.clear(inputs.clear_color, 1.0);

        let (width, height) = gl.drawing_buffer_size();
        let projection = projection(width, height).to_cols_array();
        let model_view = model_view().to_cols_array();

        gl.use_program(Some(program.handle()));
        let locations = program.locations();

        if let Some(index) = locations.vertex_position {
            gl.bind_array_buffer(Some(&self.position));
            gl.float_attrib_array(index, 2);
        }
        if let Some(index) = locations.vertex_color {
            gl.bind_array_buffer(Some(&self.color));
            gl.float_attrib_array(index, 4);
        }

        if let Some(location) = &locations.projection_matrix {
            gl.uniform_matrix4(location, &projection);
        }
        if let Some(location) = &locations.model_view_matrix {
            gl.uniform_matrix4(location, &model_view);
        }
        if inputs.upload_time {
            if let Some(location) = &locations.time {
                gl.uniform_f32(location, inputs.elapsed);
            }
        }

        gl.draw_triangle_strip(0, QUAD_VERTICES);
    }

    pub fn release(self, gl: &G) {
        gl.delete_buffer(&self.position);
        gl.delete_buffer(&self.color);
    }
}
