//! Browser `localStorage` implementation for WASM.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use web_sys::Storage;

/// Store backed by `window.localStorage`.
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StorageResult<Storage> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::storage()?
                .get_item(&key)
                .map_err(|e| StorageError::Other(format!("Get error: {:?}", e)))
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::storage()?
                .set_item(&key, &value)
                .map_err(|e| StorageError::Io(format!("Set error: {:?}", e)))
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::storage()?
                .remove_item(&key)
                .map_err(|e| StorageError::Other(format!("Remove error: {:?}", e)))
        })
    }

    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let storage = Self::storage()?;
            let len = storage
                .length()
                .map_err(|e| StorageError::Other(format!("Length error: {:?}", e)))?;
            let mut keys = Vec::with_capacity(len as usize);
            for i in 0..len {
                if let Ok(Some(key)) = storage.key(i) {
                    keys.push(key);
                }
            }
            Ok(keys)
        })
    }
}
