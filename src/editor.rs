//! Application context tying the program builder to the frame loop.
//!
//! One `Editor` exists per page. Recompiles and frames are both driven from
//! the UI thread, so they never interleave.

use log::{debug, info};

use crate::builder::ProgramBuilder;
use crate::config::RenderConfig;
use crate::console::ErrorSink;
use crate::error::{BuildError, StartupError};
use crate::frame::FrameGate;
use crate::gl::Gl;
use crate::scene::{FrameInputs, Quad};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// No program has ever linked; frames are paused.
    Idle,
    Rebuilding,
    Active,
    /// The last rebuild failed and the previous program is still drawing.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// Too soon after the previous drawn frame.
    Throttled,
    /// Nothing to draw with.
    Paused,
}

pub struct Editor<G: Gl> {
    gl: G,
    builder: ProgramBuilder<G>,
    quad: Quad<G>,
    gate: FrameGate,
    render: RenderConfig,
    state: EditorState,
    epoch_ms: Option<f64>,
}

impl<G: Gl> Editor<G> {
    /// Uploads the quad geometry. No program exists until [`Editor::recompile`].
    pub fn new(gl: G, render: RenderConfig) -> Result<Self, StartupError> {
        render.validate()?;
        let quad = Quad::upload(&gl).map_err(|err| match err {
            BuildError::Allocation(what) => StartupError::Allocation(what),
            other => StartupError::Host(other.to_string()),
        })?;
        Ok(Self {
            gate: FrameGate::with_max_fps(render.max_fps),
            builder: ProgramBuilder::new(),
            quad,
            gl,
            render,
            state: EditorState::Idle,
            epoch_ms: None,
        })
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn builder(&self) -> &ProgramBuilder<G> {
        &self.builder
    }

    /// Rebuilds the program from the given sources, reporting failures to
    /// `sink`. A failure keeps the previous program drawing when there is one.
    pub fn recompile(
        &mut self,
        vertex: &str,
        fragment: &str,
        sink: &mut dyn ErrorSink,
    ) -> Result<(), BuildError> {
        self.state = EditorState::Rebuilding;
        let result = self.builder.rebuild(&self.gl, vertex, fragment, sink);
        self.state = match (&result, self.builder.active().is_some()) {
            (Ok(()), _) => EditorState::Active,
            (Err(_), true) => EditorState::Degraded,
            (Err(_), false) => EditorState::Idle,
        };
        debug!("recompile finished in state {:?}", self.state);
        result
    }

    /// Animation-frame entry point; `now_ms` is a monotonic timestamp in
    /// milliseconds.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        let Some(program) = self.builder.active() else {
            return FrameOutcome::Paused;
        };
        if !self.gate.admit(now_ms) {
            return FrameOutcome::Throttled;
        }
        let epoch = *self.epoch_ms.get_or_insert_with(|| {
            info!("first frame drawn");
            now_ms
        });
        let inputs = FrameInputs {
            clear_color: self.render.clear_color,
            elapsed: ((now_ms - epoch) / 1000.0) as f32,
            upload_time: self.render.enable_time_uniform,
        };
        self.quad.draw(&self.gl, program, &inputs);
        self.state = EditorState::Active;
        FrameOutcome::Drawn
    }

    /// Releases every GPU object the editor created.
    pub fn teardown(mut self) -> G {
        self.builder.teardown(&self.gl);
        self.quad.release(&self.gl);
        self.gl
    }
}
