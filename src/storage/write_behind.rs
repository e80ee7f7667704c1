//! Write-behind durability.
//!
//! Mutations publish in-memory state first and queue the snapshot here. A
//! single background task applies queued writes strictly in submission order,
//! so an older snapshot can never land after a newer one.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{Persistence, StorageError};

enum WriteJob {
    Put {
        key: String,
        value: Value,
        done: oneshot::Sender<Result<(), StorageError>>,
    },
    Clear {
        done: oneshot::Sender<Result<(), StorageError>>,
    },
    Flush {
        done: oneshot::Sender<()>,
    },
}

/// Completion handle for one queued write.
///
/// Await [`Durability::wait`] to learn whether the write reached the
/// transport. Dropping the handle does not cancel the write.
#[derive(Debug)]
pub struct Durability {
    state: DurabilityState,
}

#[derive(Debug)]
enum DurabilityState {
    Settled(Result<(), StorageError>),
    Pending(oneshot::Receiver<Result<(), StorageError>>),
}

impl Durability {
    /// A handle for a mutation that had nothing to write.
    pub fn settled() -> Self {
        Durability {
            state: DurabilityState::Settled(Ok(())),
        }
    }

    pub(crate) fn failed(err: StorageError) -> Self {
        Durability {
            state: DurabilityState::Settled(Err(err)),
        }
    }

    fn pending(rx: oneshot::Receiver<Result<(), StorageError>>) -> Self {
        Durability {
            state: DurabilityState::Pending(rx),
        }
    }

    /// Wait for the write to finish and return its outcome.
    pub async fn wait(self) -> Result<(), StorageError> {
        match self.state {
            DurabilityState::Settled(result) => result,
            DurabilityState::Pending(rx) => rx.await.unwrap_or(Err(StorageError::WriterClosed)),
        }
    }
}

/// Sender side of the write-behind worker. Dropping it lets the worker drain
/// what is queued and stop.
#[derive(Debug, Clone)]
pub(crate) struct WriteBehind {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl WriteBehind {
    /// Start the worker on the current tokio runtime.
    pub(crate) fn spawn(persistence: Persistence) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

        tokio::spawn(async move {
            let mut written = 0u64;
            let mut failed = 0u64;

            while let Some(job) = rx.recv().await {
                match job {
                    WriteJob::Put { key, value, done } => {
                        let result = persistence.set_value(&key, value).await;
                        match &result {
                            Ok(()) => written += 1,
                            Err(err) => {
                                failed += 1;
                                warn!(key = %key, error = %err, "write-behind put failed");
                            }
                        }
                        let _ = done.send(result);
                    }
                    WriteJob::Clear { done } => {
                        let result = persistence.clear().await;
                        if let Err(err) = &result {
                            failed += 1;
                            warn!(error = %err, "write-behind clear failed");
                        }
                        let _ = done.send(result);
                    }
                    WriteJob::Flush { done } => {
                        let _ = done.send(());
                    }
                }
            }

            debug!(written, failed, "write-behind worker stopped");
        });

        Self { tx }
    }

    /// Queue `value` to be stored under `key`.
    pub(crate) fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Durability {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => return Durability::failed(err.into()),
        };

        let (done, rx) = oneshot::channel();
        let job = WriteJob::Put {
            key: key.to_string(),
            value,
            done,
        };
        match self.tx.send(job) {
            Ok(()) => Durability::pending(rx),
            Err(_) => Durability::failed(StorageError::WriterClosed),
        }
    }

    pub(crate) fn clear(&self) -> Durability {
        let (done, rx) = oneshot::channel();
        match self.tx.send(WriteJob::Clear { done }) {
            Ok(()) => Durability::pending(rx),
            Err(_) => Durability::failed(StorageError::WriterClosed),
        }
    }

    /// Resolve once every write queued before this call has finished.
    pub(crate) async fn flush(&self) -> Result<(), StorageError> {
        let (done, rx) = oneshot::channel();
        self.tx
            .send(WriteJob::Flush { done })
            .map_err(|_| StorageError::WriterClosed)?;
        rx.await.map_err(|_| StorageError::WriterClosed)
    }
}
