//! Safe wrapper around browser `sessionStorage`.
//!
//! Storage can be unavailable (private browsing, disabled storage, quota) or
//! absent entirely (non-browser execution). Every operation degrades to an
//! in-memory map with the same keys, so callers always observe
//! read-after-write semantics and never see a panic. Degraded mode is
//! reported once per process.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use leptos::logging::warn;

thread_local! {
    static FALLBACK: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    static WARNED: Cell<bool> = const { Cell::new(false) };
}

/// Session-scoped key/value store with an in-memory fallback.
pub struct SessionStore;

impl SessionStore {
    #[cfg(target_arch = "wasm32")]
    fn backend() -> Option<web_sys::Storage> {
        web_sys::window()?.session_storage().ok()?
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn backend() -> Option<web_sys::Storage> {
        None
    }

    fn warn_degraded() {
        WARNED.with(|w| {
            if !w.get() {
                w.set(true);
                warn!("sessionStorage unavailable, falling back to in-memory session state");
            }
        });
    }

    pub fn is_available() -> bool {
        Self::backend().is_some()
    }

    pub fn get(key: &str) -> Option<String> {
        if let Some(storage) = Self::backend() {
            if let Ok(value) = storage.get_item(key) {
                return value;
            }
        }
        Self::warn_degraded();
        FALLBACK.with(|map| map.borrow().get(key).cloned())
    }

    pub fn set(key: &str, value: &str) {
        if let Some(storage) = Self::backend() {
            if storage.set_item(key, value).is_ok() {
                return;
            }
        }
        Self::warn_degraded();
        FALLBACK.with(|map| {
            map.borrow_mut().insert(key.to_string(), value.to_string());
        });
    }

    pub fn remove(key: &str) {
        if let Some(storage) = Self::backend() {
            if storage.remove_item(key).is_ok() {
                return;
            }
        }
        FALLBACK.with(|map| {
            map.borrow_mut().remove(key);
        });
    }

    pub fn clear() {
        if let Some(storage) = Self::backend() {
            if storage.clear().is_ok() {
                return;
            }
        }
        FALLBACK.with(|map| map.borrow_mut().clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Native test builds have no browser storage, so these exercise the
    // fallback path the same way a storage-restricted browser would.

    #[test]
    fn round_trip_in_fallback_mode() {
        SessionStore::set("token", "abc123");
        assert_eq!(SessionStore::get("token").as_deref(), Some("abc123"));
        SessionStore::set("token", "def456");
        assert_eq!(SessionStore::get("token").as_deref(), Some("def456"));
    }

    #[test]
    fn remove_then_get_returns_none() {
        SessionStore::set("pendingPhone", "+22670000000");
        SessionStore::remove("pendingPhone");
        assert_eq!(SessionStore::get("pendingPhone"), None);
    }

    #[test]
    fn clear_wipes_every_key() {
        SessionStore::set("a", "1");
        SessionStore::set("b", "2");
        SessionStore::clear();
        assert_eq!(SessionStore::get("a"), None);
        assert_eq!(SessionStore::get("b"), None);
    }
}
