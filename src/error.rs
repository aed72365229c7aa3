use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::gl::Stage;

/// A shader stage the compiler rejected, with its diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub stage: Stage,
    pub diagnostic: String,
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in {} shader: {}", self.stage, self.diagnostic)
    }
}

/// Why a recompilation did not produce a new program.
///
/// All variants are recoverable: the previously linked program, if any, stays
/// active.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{}", join_failures(.0))]
    Compile(Vec<CompileFailure>),
    #[error("Error linking program: {0}")]
    Link(String),
    #[error("unable to allocate GPU {0}")]
    Allocation(&'static str),
}

impl BuildError {
    /// Stages that failed to compile; empty for link and allocation errors.
    pub fn failed_stages(&self) -> Vec<Stage> {
        match self {
            BuildError::Compile(failures) => failures.iter().map(|f| f.stage).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_failures(failures: &[CompileFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Conditions that make the editor unusable; reported once and abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("required element #{0} not found")]
    MissingElement(String),
    #[error("element #{id} is not a {expected}")]
    WrongElement { id: String, expected: &'static str },
    #[error("Unable to initialize WebGL. Your browser or machine may not support it.")]
    NoGlContext,
    #[error("unable to allocate GPU {0}")]
    Allocation(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Host(String),
}
