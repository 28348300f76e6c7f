//! Persistent key-value store abstraction.
//!
//! Every storage backend (browser-origin storage, a JSON file on native, an
//! in-memory map for testing) implements [`KeyValueStore`]. The rest of the
//! codebase depends only on the trait; session keys are namespaced through
//! the builders in [`keys`].

pub mod error;
pub mod file;
pub mod keys;
pub mod kv;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::KeyValueStore;
