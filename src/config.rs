//! Library configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::MAX_BATCH;

/// Environment variable that overrides [`LibraryConfig::data_path`].
pub const DATA_PATH_ENV: &str = "DECKHAND_DATA_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Storage keys, resolver batching and the optional on-disk location.
/// Every field has a default, so `{}` is a valid config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub collection_key: String,
    pub decks_key: String,
    pub batch_size: usize,
    pub data_path: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            collection_key: "collection".to_string(),
            decks_key: "decks".to_string(),
            batch_size: MAX_BATCH,
            data_path: None,
        }
    }
}

impl LibraryConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Apply `DECKHAND_DATA_PATH` if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_data_path_override(std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
    }

    fn with_data_path_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path.filter(|path| !path.as_os_str().is_empty()) {
            self.data_path = Some(path);
        }
        self
    }

    /// Batch size clamped to what a resolver accepts in one request.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH)
    }
}
