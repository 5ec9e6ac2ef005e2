//! Browser LocalStorage access
//!
//! Native builds have no LocalStorage; every call reports `Unavailable`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::StoreError;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StoreError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
pub fn read(key: &str) -> Result<Option<String>, StoreError> {
    local_storage()?
        .get_item(key)
        .map_err(|_| StoreError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
pub fn write(key: &str, value: &str) -> Result<(), StoreError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|_| StoreError::Unavailable)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read(_key: &str) -> Result<Option<String>, StoreError> {
    Err(StoreError::Unavailable)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(_key: &str, _value: &str) -> Result<(), StoreError> {
    Err(StoreError::Unavailable)
}

/// Read and parse a JSON value; `Ok(None)` when the key is unset
pub fn read_json<T: DeserializeOwned>(key: &str) -> Result<Option<T>, StoreError> {
    match read(key)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StoreError::Deserialize(e.to_string())),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize>(key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
    write(key, &json)
}

/// Load a JSON value, falling back to its default (with a warning) on any failure
pub fn load_or_default<T: DeserializeOwned + Default>(key: &str, what: &str) -> T {
    match read_json(key) {
        Ok(Some(value)) => {
            log::info!("Loaded {} from LocalStorage", what);
            value
        }
        Ok(None) => {
            log::info!("No saved {}, using defaults", what);
            T::default()
        }
        Err(StoreError::Unavailable) => T::default(),
        Err(e) => {
            log::warn!("Could not load {}: {}", what, e);
            T::default()
        }
    }
}

/// Save a JSON value, logging instead of failing
pub fn save_or_warn<T: Serialize>(key: &str, value: &T, what: &str) {
    match write_json(key, value) {
        Ok(()) => log::info!("{} saved", what),
        Err(StoreError::Unavailable) => {}
        Err(e) => log::warn!("Could not save {}: {}", what, e),
    }
}
