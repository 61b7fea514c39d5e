//! Best-effort key/value persistence
//!
//! LocalStorage in the browser; natively nothing is stored and loads come
//! back empty. Failures are logged and otherwise ignored.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Read and decode the JSON stored under `key`
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Stored '{}' rejected: {}", key, e);
            None
        }
    }
}

/// Encode `value` as JSON under `key`
#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    if let Some(storage) = local_storage()
        && let Ok(json) = serde_json::to_string(value)
    {
        let _ = storage.set_item(key, &json);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    log::debug!("No native store for '{}'", key);
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(_key: &str, _value: &T) {
    // No-op for native
}
