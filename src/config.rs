//! Editor configuration.
//!
//! The page may embed a JSON object in
//! `<script type="application/json" id="glsl-live-config">`; every field is
//! optional and falls back to the defaults below.

use log::LevelFilter;
use serde::Deserialize;

/// Id of the optional element carrying the JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "glsl-live-config";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub elements: ElementIds,
    pub render: RenderConfig,
    pub storage: StorageConfig,
    pub log_level: LevelFilter,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            render: RenderConfig::default(),
            storage: StorageConfig::default(),
            log_level: LevelFilter::Info,
        }
    }
}

/// DOM ids of the controls the editor binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub canvas: String,
    pub vertex_source: String,
    pub fragment_source: String,
    pub console: String,
    pub compile_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            canvas: "gl-canvas".into(),
            vertex_source: "vert-shader-source".into(),
            fragment_source: "frag-shader-source".into(),
            console: "glsl-console".into(),
            compile_button: "compile-shaders-button".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Upper bound on rendered frames per second.
    pub max_fps: f64,
    /// Upload elapsed seconds to `uTime` when the program declares it.
    pub enable_time_uniform: bool,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_fps: 60.0,
            enable_time_uniform: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    /// Key holding the id of the control focused when the page unloaded.
    pub focus_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            focus_key: "focusedElementId".into(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fps = self.max_fps;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render.maxFps must be a positive number, got {fps}"
            )));
        }
        if let Some(c) = self
            .clear_color
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(ConfigError::Invalid(format!(
                "render.clearColor components must lie in [0, 1], got {c}"
            )));
        }
        Ok(())
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render.validate()?;
        let ids = &self.elements;
        for (field, id) in [
            ("canvas", &ids.canvas),
            ("vertexSource", &ids.vertex_source),
            ("fragmentSource", &ids.fragment_source),
            ("console", &ids.console),
            ("compileButton", &ids.compile_button),
        ] {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("elements.{field} is empty")));
            }
        }
        if self.storage.focus_key.is_empty() {
            return Err(ConfigError::Invalid("storage.focusKey is empty".into()));
        }
        Ok(())
    }
}
