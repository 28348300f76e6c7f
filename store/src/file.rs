//! JSON-file-backed key-value store for native targets.
//!
//! Plays the role the browser's origin storage plays for the web frontend:
//! a small string map that survives restarts. Every write lands on disk
//! before the call returns; the file is replaced atomically via a sibling
//! temp file so a crash mid-write can never leave a half-written map.

use crate::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A persistent key-value store backed by one JSON file.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store at `path`.
    ///
    /// A malformed existing file is treated as empty rather than an error;
    /// the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "store file malformed, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
