//! Editor state that survives a page reload.
//!
//! Stage sources are stored under the id of their text control. The id of the
//! last focused control is stored under a dedicated key and consumed on the
//! next load.

use std::collections::HashMap;

/// String key-value storage with `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Returns the stored source for `key`, seeding the store with `default`
/// when nothing (or only an empty string) was saved.
pub fn restore_source(store: &mut impl KeyValueStore, key: &str, default: &str) -> String {
    match store.get(key) {
        Some(saved) if !saved.is_empty() => saved,
        _ => {
            store.set(key, default);
            default.to_owned()
        }
    }
}

pub fn save_source(store: &mut impl KeyValueStore, key: &str, source: &str) {
    store.set(key, source);
}

/// Remembers which control had focus. Controls without an id are not recorded.
pub fn save_focus(store: &mut impl KeyValueStore, focus_key: &str, element_id: Option<&str>) {
    if let Some(id) = element_id.filter(|id| !id.is_empty()) {
        store.set(focus_key, id);
    }
}

/// Takes the remembered focus target, clearing it from the store.
pub fn take_focus(store: &mut impl KeyValueStore, focus_key: &str) -> Option<String> {
    let id = store.get(focus_key).filter(|id| !id.is_empty());
    if id.is_some() {
        store.remove(focus_key);
    }
    id
}
