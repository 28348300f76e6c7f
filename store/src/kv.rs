//! The key-value store trait.

use crate::StoreError;

/// A synchronous, process-wide, string-keyed store surviving restarts.
///
/// Mirrors the browser's origin-scoped storage surface: read, write, delete.
/// Structured values (milestone logs, tip logs) are serialized as JSON text
/// by the caller; the store only ever sees strings.
///
/// Implementations must be thread-safe; the session layer shares one store
/// handle across every operation.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the entry under `key`. Deleting an absent key is a no-op.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Read a boolean flag: present and literally `"true"` means set.
    fn get_flag(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.as_deref() == Some("true"))
    }

    /// Write or clear a boolean flag. Clearing removes the entry entirely so
    /// an unset flag and a never-set flag are indistinguishable.
    fn put_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        if value {
            self.put(key, "true")
        } else {
            self.delete(key)
        }
    }
}
