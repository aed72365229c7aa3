//! Live GLSL editing on a WebGL2 canvas.
//!
//! The program builder, frame pacing, scene and persistence logic are
//! host-independent and talk to the GPU through [`gl::Gl`]; the browser
//! binding in `wasm` wires them to the page.

pub mod builder;
pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod frame;
pub mod gl;
pub mod persist;
pub mod scene;
pub mod shaders;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::error::StartupError;

    mod dom;
    mod gl;
    mod logger;
    mod render;
    mod storage;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        logger::init(log::LevelFilter::Info);
        start().map_err(|err| {
            log::error!("startup failed: {err}");
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&err.to_string());
            }
            JsValue::from_str(&err.to_string())
        })
    }

    fn start() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or_else(|| StartupError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| StartupError::Host("no document".into()))?;

        let config = dom::read_config(&document)?;
        log::set_max_level(config.log_level);

        let page = dom::Page::bind(&document, &config.elements)?;
        let gl = gl::context(&page.canvas)?;
        let store = storage::LocalStorage::open(&window);

        render::start(window, page, gl, store, config)
    }
}
