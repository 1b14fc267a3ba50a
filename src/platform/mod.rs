//! Platform abstraction layer
//!
//! LocalStorage access shared by settings and high scores. Native builds
//! keep the same surface with no backing store.

/// Read a string value from persistent storage
#[cfg(target_arch = "wasm32")]
pub fn storage_get(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

/// Write a string value to persistent storage
#[cfg(target_arch = "wasm32")]
pub fn storage_set(key: &str, value: &str) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if storage.set_item(key, value).is_err() {
            log::warn!("Failed to persist {}", key);
        }
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn storage_get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_set(_key: &str, _value: &str) {
    // No-op for native
}
