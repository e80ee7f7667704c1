use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("write-behind worker is not running")]
    WriterClosed,
}
