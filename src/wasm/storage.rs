use web_sys::{Storage, Window};

use crate::persist::{KeyValueStore, MemoryStore};

/// `window.localStorage`, or a session-only map when the browser denies it
/// (private browsing, disabled storage).
pub enum LocalStorage {
    Browser(Storage),
    Session(MemoryStore),
}

impl LocalStorage {
    pub fn open(window: &Window) -> Self {
        match window.local_storage() {
            Ok(Some(storage)) => LocalStorage::Browser(storage),
            _ => {
                log::warn!("localStorage unavailable; edits will not survive a reload");
                LocalStorage::Session(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            LocalStorage::Browser(storage) => storage.get_item(key).ok().flatten(),
            LocalStorage::Session(map) => map.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match self {
            LocalStorage::Browser(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("failed to persist {key}");
                }
            }
            LocalStorage::Session(map) => map.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match self {
            LocalStorage::Browser(storage) => {
                if storage.remove_item(key).is_err() {
                    log::warn!("failed to clear {key}");
                }
            }
            LocalStorage::Session(map) => map.remove(key),
        }
    }
}
