//! Storage abstraction for persistence.
//!
//! Everything the diary keeps lives in a single key-value store holding JSON
//! strings, mirroring browser `localStorage`.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Diary entries.
pub const ENTRIES_KEY: &str = "diaries_v2";
/// PIN for the lock screen.
pub const PIN_KEY: &str = "diaryPin";
/// `light` or `dark`.
pub const THEME_KEY: &str = "diaryTheme";
/// Cat parts selection.
pub const CAT_PROFILE_KEY: &str = "pawCatProfile";
/// Saved cat renders.
pub const CAT_GALLERY_KEY: &str = "pawCatGallery";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A string key-value store.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys yield `None`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all keys.
    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
}

/// A string key-value store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait KeyValueStore {
    /// Read a value. Missing keys yield `None`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all keys.
    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
}

/// Read and parse a JSON value.
pub async fn load_json<S, T>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value.
pub async fn save_json<S, T>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        block_on(save_json(&store, "numbers", &vec![1, 2, 3])).unwrap();
        let loaded: Option<Vec<i32>> = block_on(load_json(&store, "numbers")).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i32>> = block_on(load_json(&store, "other")).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_corrupt_json_is_error() {
        let store = MemoryStore::new();
        block_on(store.set("bad", "{not json".to_string())).unwrap();
        let result: StorageResult<Option<Vec<i32>>> = block_on(load_json(&store, "bad"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
