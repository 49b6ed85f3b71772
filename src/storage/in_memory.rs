//! In-memory key-value storage for testing and development

use crate::core::error::StorageError;
use crate::core::store::KeyValueStorage;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory `KeyValueStorage`.
///
/// Clones share the same map, so a test can keep a handle to inspect or seed
/// the raw blobs while a store owns another.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a raw value under `key`
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut items) = storage.items.write() {
            items.insert(key.into(), value.into());
        }
        storage
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        items.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        items.remove(key);

        Ok(())
    }
}
