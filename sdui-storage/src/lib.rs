//! Key-value persistence for the SDUI engine.
//!
//! The engine only needs string get/put/remove keyed storage with no
//! cross-key transactions. [`KeyValueStore`] is that contract; two backends
//! ship with the crate:
//!
//! - [`MemoryStore`]: process-local map, used in tests and as a fallback
//! - [`SqliteStore`]: a single `kv` table in a SQLite file
//!
//! Keys used by the engine are namespaced: `screen.cache.<screenKey>` for the
//! persistent screen tier and `sync.bundle.*` for the local sync store.

mod error;
mod memory;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

/// String key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Missing keys are `Ok(None)`.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Inserts or overwrites a value.
    async fn put(&self, key: &str, value: String) -> StorageResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Lists every key starting with `prefix`, sorted.
    async fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
