use std::fmt;

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which store a change notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeScope {
    Collection,
    Decks,
}

impl ChangeScope {
    pub fn event_name(self) -> &'static str {
        match self {
            ChangeScope::Collection => "collection:changed",
            ChangeScope::Decks => "decks:changed",
        }
    }
}

impl fmt::Display for ChangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Sent to observers after a new state is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotice {
    pub scope: ChangeScope,
    /// Revision of the scope's state, starting at 0 when the library opens.
    pub revision: u64,
    /// Entries in the collection or decks in the list after the change.
    pub len: usize,
}

/// Observer registry. Listeners run on the emitter's own threads, so they
/// never block a mutator.
pub(crate) struct ChangeEvents {
    emitter: EventEmitter,
}

impl ChangeEvents {
    pub(crate) fn new() -> Self {
        ChangeEvents {
            emitter: EventEmitter::new(),
        }
    }

    pub(crate) fn on<F>(&mut self, scope: ChangeScope, listener: F) -> String
    where
        F: Fn(ChangeNotice) + Send + Sync + 'static,
    {
        self.emitter.on(scope.event_name(), move |payload: String| {
            match serde_json::from_str::<ChangeNotice>(&payload) {
                Ok(notice) => listener(notice),
                Err(err) => warn!(error = %err, "dropping malformed change notice"),
            }
        })
    }

    pub(crate) fn remove_listener(&mut self, id: &str) {
        let _ = self.emitter.remove_listener(id);
    }

    pub(crate) fn emit(&mut self, notice: ChangeNotice) {
        match serde_json::to_string(&notice) {
            Ok(payload) => {
                self.emitter.emit(notice.scope.event_name(), payload);
            }
            Err(err) => warn!(error = %err, "failed to encode change notice"),
        }
    }
}
