use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL, Window};

use crate::config::EditorConfig;
use crate::editor::{Editor, EditorState};
use crate::error::StartupError;
use crate::shaders::{DEFAULT_FRAGMENT, DEFAULT_VERTEX};

use super::dom::{self, host_error, Page, SharedStore};
use super::storage::LocalStorage;

/// Wires the page, compiles the restored sources and starts the render loop.
pub fn start(
    window: Window,
    page: Page,
    gl: GL,
    store: LocalStorage,
    config: EditorConfig,
) -> Result<(), StartupError> {
    let store: SharedStore = Rc::new(RefCell::new(store));
    dom::bind_source(&page.vertex_source, DEFAULT_VERTEX, &store)?;
    dom::bind_source(&page.fragment_source, DEFAULT_FRAGMENT, &store)?;
    dom::bind_tabs(&page.document)?;
    dom::bind_focus(&window, &page.document, &store, &config.storage.focus_key)?;

    // Resize the drawing buffer to the canvas' CSS box
    resize(&page.canvas);
    {
        let canvas = page.canvas.clone();
        dom::listen(&window, "resize", move |_: web_sys::Event| resize(&canvas))?;
    }

    let editor = Editor::new(gl, config.render.clone())?;
    let editor = Rc::new(RefCell::new(editor));

    let page = Rc::new(page);
    recompile(&editor, &page);
    {
        let editor = editor.clone();
        let button_page = page.clone();
        dom::listen(&page.compile_button, "click", move |_: web_sys::Event| {
            recompile(&editor, &button_page);
        })?;
    }

    run_loop(window, editor)
}

fn recompile(editor: &Rc<RefCell<Editor<GL>>>, page: &Page) {
    let (vertex, fragment) = page.sources();
    let mut console = page.console();
    let mut editor = editor.borrow_mut();
    if let Err(err) = editor.recompile(&vertex, &fragment, &mut console) {
        match editor.state() {
            EditorState::Degraded => log::info!("keeping previous program: {err}"),
            _ => log::info!("rendering paused until the shaders compile"),
        }
    }
}

fn resize(canvas: &HtmlCanvasElement) {
    let width = canvas.client_width().max(1) as u32;
    let height = canvas.client_height().max(1) as u32;
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
}

fn run_loop(window: Window, editor: Rc<RefCell<Editor<GL>>>) -> Result<(), StartupError> {
    let performance = window
        .performance()
        .ok_or_else(|| StartupError::Host("performance timer unavailable".into()))?;

    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let scheduler = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        editor.borrow_mut().frame(performance.now());

        // schedule next
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(err) = scheduler.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("render loop stopped: {}", host_error(err));
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(host_error)?;
    }
    Ok(())
}
