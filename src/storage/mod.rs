//! Key-value persistence port and its backends.
//!
//! The stores only ever need four operations on JSON values. Anything that
//! can provide them (a file, a browser store, a remote service) plugs in as a
//! [`KeyValueStore`]. [`Persistence`] wraps an optional store and degrades to
//! defaults and no-op writes when none is attached.

mod error;
mod in_memory;
mod json_file;
mod persistence;
mod write_behind;

use async_trait::async_trait;
use serde_json::Value;

pub use error::StorageError;
pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use persistence::Persistence;
pub use write_behind::Durability;
pub(crate) use write_behind::WriteBehind;

/// Async key-value transport for JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), StorageError>;
}
