use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resolver transport error: {0}")]
    Transport(String),
    #[error("resolver returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("resolver response could not be decoded: {0}")]
    Decode(String),
    #[error("batch of {requested} identifiers exceeds the limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },
}
