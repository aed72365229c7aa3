//! Compiles a vertex/fragment pair into a linked program.
//!
//! A rebuild always links into a fresh program object. The active program is
//! swapped out only after the candidate linked, so a broken edit never
//! replaces a working program. Shaders stay attached to the program they
//! linked and are detached and deleted when that program is retired.

use log::{debug, info, warn};

use crate::console::ErrorSink;
use crate::error::{BuildError, CompileFailure};
use crate::gl::{Gl, Stage};

pub const VERTEX_POSITION: &str = "aVertexPosition";
pub const VERTEX_COLOR: &str = "aVertexColor";
pub const PROJECTION_MATRIX: &str = "uProjectionMatrix";
pub const MODEL_VIEW_MATRIX: &str = "uModelViewMatrix";
pub const TIME: &str = "uTime";

/// Attribute and uniform locations of a linked program. `None` means the
/// program does not use that input and nothing may be uploaded to it.
pub struct LocationTable<U> {
    pub vertex_position: Option<u32>,
    pub vertex_color: Option<u32>,
    pub projection_matrix: Option<U>,
    pub model_view_matrix: Option<U>,
    pub time: Option<U>,
}

impl<U> LocationTable<U> {
    fn resolve<G: Gl<UniformLocation = U>>(gl: &G, program: &G::Program) -> Self {
        let attrib = |name: &str| u32::try_from(gl.attrib_location(program, name)).ok();
        Self {
            vertex_position: attrib(VERTEX_POSITION),
            vertex_color: attrib(VERTEX_COLOR),
            projection_matrix: gl.uniform_location(program, PROJECTION_MATRIX),
            model_view_matrix: gl.uniform_location(program, MODEL_VIEW_MATRIX),
            time: gl.uniform_location(program, TIME),
        }
    }
}

pub struct LinkedProgram<G: Gl> {
    program: G::Program,
    locations: LocationTable<G::UniformLocation>,
}

impl<G: Gl> LinkedProgram<G> {
    pub fn handle(&self) -> &G::Program {
        &self.program
    }

    pub fn locations(&self) -> &LocationTable<G::UniformLocation> {
        &self.locations
    }
}

/// Owns the active program and replaces it on successful rebuilds.
pub struct ProgramBuilder<G: Gl> {
    active: Option<LinkedProgram<G>>,
    generation: u32,
}

impl<G: Gl> Default for ProgramBuilder<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gl> ProgramBuilder<G> {
    pub fn new() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }

    /// The program frames should draw with, if any build has succeeded.
    pub fn active(&self) -> Option<&LinkedProgram<G>> {
        self.active.as_ref()
    }

    /// Number of successful builds so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Compiles both stages and links them.
    ///
    /// Every failure is written to `sink` as a user-facing line before it is
    /// returned. On failure the active program is left untouched.
    pub fn rebuild(
        &mut self,
        gl: &G,
        vertex: &str,
        fragment: &str,
        sink: &mut dyn ErrorSink,
    ) -> Result<(), BuildError> {
        let program = gl
            .create_program()
            .ok_or(BuildError::Allocation("program"))?;

        let mut compiled = Vec::with_capacity(2);
        let mut failures = Vec::new();
        for (stage, source) in [(Stage::Vertex, vertex), (Stage::Fragment, fragment)] {
            match compile_stage(gl, stage, source) {
                Ok(shader) => compiled.push(shader),
                Err(failure) => {
                    warn!("{stage} shader failed to compile");
                    sink.append(&failure.to_string());
                    failures.push(failure);
                }
            }
        }

        if !failures.is_empty() {
            for shader in &compiled {
                gl.delete_shader(shader);
            }
            gl.delete_program(&program);
            return Err(BuildError::Compile(failures));
        }

        for shader in &compiled {
            gl.attach_shader(&program, shader);
        }
        gl.link_program(&program);

        if !gl.link_status(&program) {
            let diagnostic = clean_log(&gl.program_info_log(&program));
            warn!("program link failed: {diagnostic}");
            let err = BuildError::Link(diagnostic);
            sink.append(&err.to_string());
            destroy_program(gl, &program);
            return Err(err);
        }

        let locations = LocationTable::resolve(gl, &program);
        if locations.vertex_position.is_none() {
            debug!("linked program has no active {VERTEX_POSITION}");
        }
        if let Some(old) = self.active.replace(LinkedProgram { program, locations }) {
            destroy_program(gl, &old.program);
        }
        self.generation += 1;
        info!("shader program #{} linked", self.generation);
        Ok(())
    }

    /// Releases the active program and its shaders.
    pub fn teardown(&mut self, gl: &G) {
        if let Some(old) = self.active.take() {
            destroy_program(gl, &old.program);
        }
    }
}

fn compile_stage<G: Gl>(gl: &G, stage: Stage, source: &str) -> Result<G::Shader, CompileFailure> {
    let shader = gl.create_shader(stage).ok_or_else(|| CompileFailure {
        stage,
        diagnostic: "unable to allocate shader object".into(),
    })?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl.compile_status(&shader) {
        return Ok(shader);
    }
    let diagnostic = clean_log(&gl.shader_info_log(&shader));
    gl.delete_shader(&shader);
    Err(CompileFailure { stage, diagnostic })
}

/// Detaches and deletes whatever shaders `program` holds. Idempotent.
fn release_shaders<G: Gl>(gl: &G, program: &G::Program) {
    for shader in gl.attached_shaders(program) {
        gl.detach_shader(program, &shader);
        gl.delete_shader(&shader);
    }
}

fn destroy_program<G: Gl>(gl: &G, program: &G::Program) {
    release_shaders(gl, program);
    gl.delete_program(program);
}

// Drivers terminate info logs with newlines and sometimes a NUL.
fn clean_log(log: &str) -> String {
    log.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_owned()
}
