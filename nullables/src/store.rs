//! Nullable store — thread-safe in-memory key-value storage for testing.

use becoming_store::{KeyValueStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory key-value store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl NullKvStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries; handy for idempotence assertions.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for NullKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for NullKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
