//! JsonFileStore - every key lives in one JSON object on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// File-backed key-value store.
///
/// The whole document is cached in memory and rewritten on every change:
/// written to a sibling temp file first, then renamed over the original so a
/// crash mid-write leaves the previous document intact.
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`. A missing or empty file is
    /// an empty store; a file that is not a JSON object is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let document = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Map::new(),
            Ok(bytes) => serde_json::from_slice::<Map<String, Value>>(&bytes).map_err(|err| {
                StorageError::Corrupt {
                    path: path.clone(),
                    message: err.to_string(),
                }
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), keys = document.len(), "opened json store");
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, document: &Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let document = self.document.lock().await;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut document = self.document.lock().await;
        document.insert(key.to_string(), value);
        self.write(&document).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut document = self.document.lock().await;
        if document.remove(key).is_some() {
            self.write(&document).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut document = self.document.lock().await;
        document.clear();
        self.write(&document).await
    }
}
