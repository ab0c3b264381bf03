//! In-memory storage implementation.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            Ok(values.get(&key).cloned())
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut values = self.values.write().map_err(lock_error)?;
            values.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut values = self.values.write().map_err(lock_error)?;
            values.remove(&key);
            Ok(())
        })
    }

    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            Ok(values.keys().cloned().collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new();
        block_on(store.set("theme", "dark".to_string())).unwrap();
        assert_eq!(block_on(store.get("theme")).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(block_on(store.get("nonexistent")).unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        block_on(store.set("pin", "1234".to_string())).unwrap();
        block_on(store.remove("pin")).unwrap();
        block_on(store.remove("pin")).unwrap();
        assert_eq!(block_on(store.get("pin")).unwrap(), None);
    }

    #[test]
    fn test_keys() {
        let store = MemoryStore::new();
        block_on(store.set("a", "1".to_string())).unwrap();
        block_on(store.set("b", "2".to_string())).unwrap();

        let mut keys = block_on(store.keys()).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
