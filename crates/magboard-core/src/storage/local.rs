//! Browser `localStorage` implementation for WebAssembly.

use super::{Storage, StorageError, StorageResult};

/// Storage backed by `window.localStorage`.
///
/// The handle is looked up on every call, so a store that becomes
/// unavailable mid-session (private browsing, quota, policy) surfaces as
/// [`StorageError::Unavailable`] on that call only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn handle() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage blocked: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::handle()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("getItem failed: {:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::handle()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("setItem failed: {:?}", e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Self::handle()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("removeItem failed: {:?}", e)))
    }
}
