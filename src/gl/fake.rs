//! Recording stand-in for a GL context.
//!
//! Compilation is a line-level check: every statement line must end in `;`,
//! `{` or `}`, braces must balance and `main` must exist. Multi-line
//! statements are therefore rejected, which none of the test sources use.
//! Linking resolves `attribute` and `uniform` declarations in declaration
//! order.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Gl, Stage};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<u32>),
    Clear([f32; 4]),
    AttribArray { index: u32, components: i32 },
    UniformMatrix(String),
    UniformF32(String, f32),
    Draw { first: i32, count: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeUniform {
    pub name: String,
}

struct ShaderObject {
    stage: Stage,
    source: String,
    log: Option<String>,
    compiled: bool,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashMap<u32, Vec<f32>>,
    calls: Vec<Call>,
    link_failure: Option<String>,
    size: (u32, u32),
}

impl State {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FakeGl {
    state: RefCell<State>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                size: (640, 480),
                ..State::default()
            }),
        }
    }

    /// Makes every subsequent link fail with `log`.
    pub fn fail_links_with(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_owned());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn buffer_data(&self, buffer: u32) -> Option<Vec<f32>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split("//").next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        depth += line.matches('{').count() as i32;
        depth -= line.matches('}').count() as i32;
        if depth < 0 {
            return Err(format!("ERROR: 0:{}: '}}' : syntax error", index + 1));
        }
        if !(line.ends_with(';') || line.ends_with('{') || line.ends_with('}')) {
            return Err(format!(
                "ERROR: 0:{}: '{}' : syntax error",
                index + 2,
                line.split_whitespace().last().unwrap_or("")
            ));
        }
    }
    if depth != 0 {
        return Err("ERROR: 0:0: '' : unexpected end of file".to_owned());
    }
    if !source.contains("void main") {
        return Err("ERROR: 0:0: 'main' : function not defined".to_owned());
    }
    Ok(())
}

fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim().trim_end_matches(';');
            let mut words = line.split_whitespace();
            if words.next()? != qualifier {
                return None;
            }
            words.last().map(str::to_owned)
        })
        .collect()
}

impl Gl for FakeGl {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type UniformLocation = FakeUniform;

    fn create_program(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let id = state.next();
        state.programs.insert(id, ProgramObject::default());
        Some(id)
    }

    fn delete_program(&self, program: &u32) {
        self.state.borrow_mut().programs.remove(program);
    }

    fn attached_shaders(&self, program: &u32) -> Vec<u32> {
        self.state
            .borrow()
            .programs
            .get(program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(program) {
            p.attached.push(*shader);
        }
    }

    fn detach_shader(&self, program: &u32, shader: &u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(program) {
            p.attached.retain(|s| s != shader);
        }
    }

    fn link_program(&self, program: &u32) {
        let mut state = self.state.borrow_mut();
        let failure = state.link_failure.clone();
        let attached = match state.programs.get(program) {
            Some(p) => p.attached.clone(),
            None => return,
        };
        let mut vertex = None;
        let mut fragment = None;
        for id in &attached {
            if let Some(shader) = state.shaders.get(id).filter(|s| s.compiled) {
                match shader.stage {
                    Stage::Vertex => vertex = Some(shader.source.clone()),
                    Stage::Fragment => fragment = Some(shader.source.clone()),
                }
            }
        }
        let Some(p) = state.programs.get_mut(program) else {
            return;
        };
        match (vertex, fragment, failure) {
            (Some(vs), Some(fs), None) => {
                p.linked = true;
                p.log.clear();
                p.attributes = declared(&vs, "attribute");
                p.uniforms = declared(&vs, "uniform");
                for name in declared(&fs, "uniform") {
                    if !p.uniforms.contains(&name) {
                        p.uniforms.push(name);
                    }
                }
            }
            (_, _, Some(log)) => {
                p.linked = false;
                p.log = log;
            }
            _ => {
                p.linked = false;
                p.log = "missing shader stage".to_owned();
            }
        }
    }

    fn link_status(&self, program: &u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: &u32) -> String {
        self.state
            .borrow()
            .programs
            .get(program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<&u32>) {
        self.record(Call::UseProgram(program.copied()));
    }

    fn create_shader(&self, stage: Stage) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let id = state.next();
        state.shaders.insert(
            id,
            ShaderObject {
                stage,
                source: String::new(),
                log: None,
                compiled: false,
            },
        );
        Some(id)
    }

    fn shader_source(&self, shader: &u32, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(shader) {
            s.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: &u32) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(shader) {
            match check_syntax(&s.source) {
                Ok(()) => {
                    s.compiled = true;
                    s.log = None;
                }
                Err(log) => {
                    s.compiled = false;
                    s.log = Some(format!("{log}\n\0"));
                }
            }
        }
    }

    fn compile_status(&self, shader: &u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: &u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(shader)
            .and_then(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: &u32) {
        self.state.borrow_mut().shaders.remove(shader);
    }

    fn attrib_location(&self, program: &u32, name: &str) -> i32 {
        self.state
            .borrow()
            .programs
            .get(program)
            .filter(|p| p.linked)
            .and_then(|p| p.attributes.iter().position(|a| a == name))
            .map_or(-1, |index| index as i32)
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<FakeUniform> {
        let state = self.state.borrow();
        let p = state.programs.get(program).filter(|p| p.linked)?;
        p.uniforms.iter().any(|u| u == name).then(|| FakeUniform {
            name: name.to_owned(),
        })
    }

    fn create_buffer(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let id = state.next();
        state.buffers.insert(id, Vec::new());
        Some(id)
    }

    fn delete_buffer(&self, buffer: &u32) {
        self.state.borrow_mut().buffers.remove(buffer);
    }

    fn upload_static(&self, buffer: &u32, data: &[f32]) {
        if let Some(b) = self.state.borrow_mut().buffers.get_mut(buffer) {
            *b = data.to_vec();
        }
    }

    fn bind_array_buffer(&self, _buffer: Option<&u32>) {}

    fn float_attrib_array(&self, index: u32, components: i32) {
        self.record(Call::AttribArray { index, components });
    }

    fn clear(&self, color: [f32; 4], _depth: f32) {
        self.record(Call::Clear(color));
    }

    fn uniform_matrix4(&self, location: &FakeUniform, _columns: &[f32; 16]) {
        self.record(Call::UniformMatrix(location.name.clone()));
    }

    fn uniform_f32(&self, location: &FakeUniform, value: f32) {
        self.record(Call::UniformF32(location.name.clone(), value));
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.record(Call::Draw { first, count });
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.state.borrow().size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_semicolon_is_a_syntax_error() {
        let err = check_syntax("void main() {\n  gl_FragColor = vColor\n}\n").unwrap_err();
        assert!(err.contains("syntax error"), "{err}");
    }

    #[test]
    fn declarations_are_collected_in_order() {
        let src = "attribute vec2 aVertexPosition;\nattribute lowp vec4 aVertexColor;\n";
        assert_eq!(declared(src, "attribute"), ["aVertexPosition", "aVertexColor"]);
    }
}
