//! Page lookup and the small bits of UI behaviour around the editor.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    Document, Element, EventTarget, HtmlCanvasElement, HtmlElement, HtmlTextAreaElement,
    KeyboardEvent,
};

use crate::config::{EditorConfig, ElementIds, CONFIG_ELEMENT_ID};
use crate::console::ErrorSink;
use crate::error::StartupError;
use crate::persist::{self, KeyValueStore};

use super::storage::LocalStorage;

pub type SharedStore = Rc<RefCell<LocalStorage>>;

/// Reads the optional embedded JSON config; absent means defaults.
pub fn read_config(document: &Document) -> Result<EditorConfig, StartupError> {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .filter(|text| !text.trim().is_empty());
    match text {
        Some(text) => Ok(EditorConfig::from_json(&text)?),
        None => Ok(EditorConfig::default()),
    }
}

/// The elements the editor cannot work without.
pub struct Page {
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub vertex_source: HtmlTextAreaElement,
    pub fragment_source: HtmlTextAreaElement,
    pub console: Element,
    pub compile_button: HtmlElement,
}

impl Page {
    pub fn bind(document: &Document, ids: &ElementIds) -> Result<Self, StartupError> {
        Ok(Self {
            document: document.clone(),
            canvas: require(document, &ids.canvas, "canvas")?,
            vertex_source: require(document, &ids.vertex_source, "textarea")?,
            fragment_source: require(document, &ids.fragment_source, "textarea")?,
            console: require(document, &ids.console, "element")?,
            compile_button: require(document, &ids.compile_button, "button")?,
        })
    }

    pub fn sources(&self) -> (String, String) {
        (self.vertex_source.value(), self.fragment_source.value())
    }

    pub fn console(&self) -> DomConsole {
        DomConsole {
            element: self.console.clone(),
        }
    }
}

fn require<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T, StartupError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| StartupError::MissingElement(id.to_owned()))?
        .dyn_into::<T>()
        .map_err(|_| StartupError::WrongElement {
            id: id.to_owned(),
            expected,
        })
}

/// Appends diagnostics as text lines to the on-page console.
pub struct DomConsole {
    element: Element,
}

impl ErrorSink for DomConsole {
    fn append(&mut self, line: &str) {
        let appended = self
            .element
            .insert_adjacent_text("beforeend", line)
            .and_then(|_| self.element.insert_adjacent_html("beforeend", "<br>"));
        if appended.is_err() {
            log::error!("could not write to shader console: {line}");
        }
        self.element.set_scroll_top(self.element.scroll_height());
    }
}

pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<(), StartupError>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(host_error)?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

pub fn host_error(value: wasm_bindgen::JsValue) -> StartupError {
    StartupError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Fills `area` from the store (seeding `default`) and saves every edit.
pub fn bind_source(area: &HtmlTextAreaElement, default: &str, store: &SharedStore) -> Result<(), StartupError> {
    let key = area.id();
    let restored = persist::restore_source(&mut *store.borrow_mut(), &key, default);
    area.set_value(&restored);

    let store = store.clone();
    let source = area.clone();
    listen(area, "input", move |_: web_sys::Event| {
        persist::save_source(&mut *store.borrow_mut(), &key, &source.value());
    })?;

    // keep Tab inside the editor
    listen(area, "keydown", |event: KeyboardEvent| {
        if event.key() == "Tab" {
            event.prevent_default();
        }
    })
}

/// Saves the focused control on unload and restores it now.
pub fn bind_focus(window: &web_sys::Window, document: &Document, store: &SharedStore, focus_key: &str) -> Result<(), StartupError> {
    let remembered = persist::take_focus(&mut *store.borrow_mut(), focus_key);
    if let Some(id) = remembered {
        match document
            .get_element_by_id(&id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            Some(element) => {
                if element.focus().is_err() {
                    log::debug!("could not focus #{id}");
                }
            }
            None => log::debug!("remembered focus target #{id} is gone"),
        }
    }

    let store = store.clone();
    let document = document.clone();
    let focus_key = focus_key.to_owned();
    listen(window, "beforeunload", move |_: web_sys::Event| {
        let active = document.active_element().map(|element| element.id());
        persist::save_focus(&mut *store.borrow_mut(), &focus_key, active.as_deref());
    })
}

/// Wires `.tab-link[data-target]` buttons to show the matching `.tab-content`.
pub fn bind_tabs(document: &Document) -> Result<(), StartupError> {
    let links = document.query_selector_all(".tab-link").map_err(host_error)?;
    for index in 0..links.length() {
        let Some(link) = links.item(index).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let document = document.clone();
        let this = link.clone();
        listen(&link, "click", move |_: web_sys::Event| {
            if let Err(err) = activate_tab(&document, &this) {
                log::warn!("tab switch failed: {err}");
            }
        })?;
    }
    Ok(())
}

fn activate_tab(document: &Document, link: &Element) -> Result<(), StartupError> {
    clear_active(document, ".tab-link")?;
    link.class_list().add_1("active").map_err(host_error)?;

    let Some(target) = link.get_attribute("data-target") else {
        return Ok(());
    };
    clear_active(document, ".tab-content")?;
    if let Some(panel) = document.get_element_by_id(&target) {
        panel.class_list().add_1("active").map_err(host_error)?;
    }
    Ok(())
}

fn clear_active(document: &Document, selector: &str) -> Result<(), StartupError> {
    let nodes = document.query_selector_all(selector).map_err(host_error)?;
    for index in 0..nodes.length() {
        if let Some(element) = nodes.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            element.class_list().remove_1("active").map_err(host_error)?;
        }
    }
    Ok(())
}
