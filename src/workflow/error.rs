use thiserror::Error;

use crate::resolver::ResolveError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("deck {0} does not exist")]
    UnknownDeck(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
