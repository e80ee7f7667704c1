use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::LibraryConfig;

use super::{JsonFileStore, KeyValueStore, StorageError};

/// Handle to an optional key-value transport.
///
/// A detached handle has no transport: reads return the caller's default and
/// writes succeed without doing anything. The library then runs purely in
/// memory and nothing survives a restart.
#[derive(Clone, Default)]
pub struct Persistence {
    port: Option<Arc<dyn KeyValueStore>>,
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Persistence {
    pub fn attached<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            port: Some(Arc::new(store)),
        }
    }

    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { port: Some(store) }
    }

    pub fn detached() -> Self {
        Self { port: None }
    }

    /// File-backed when `data_path` is configured, detached otherwise.
    pub async fn from_config(config: &LibraryConfig) -> Result<Self, StorageError> {
        match &config.data_path {
            Some(path) => Ok(Self::attached(JsonFileStore::open(path).await?)),
            None => Ok(Self::detached()),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.port.is_some()
    }

    /// Stored value decoded as `T`, or `default` when the key is absent or
    /// null, the transport is missing or failing, or the value does not
    /// decode. Failures are logged, never returned.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(port) = &self.port else {
            return default;
        };

        match port.get(key).await {
            Ok(None) | Ok(Some(Value::Null)) => default,
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!(key, error = %err, "stored value does not decode, using default");
                    default
                }
            },
            Err(err) => {
                warn!(key, error = %err, "storage read failed, using default");
                default
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.set_value(key, serde_json::to_value(value)?).await
    }

    pub async fn set_value(&self, key: &str, value: Value) -> Result<(), StorageError> {
        match &self.port {
            Some(port) => port.set(key, value).await,
            None => Ok(()),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match &self.port {
            Some(port) => port.delete(key).await,
            None => Ok(()),
        }
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        match &self.port {
            Some(port) => port.clear().await,
            None => Ok(()),
        }
    }
}
