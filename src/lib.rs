//! Card collection and deck store for trading-card games.
//!
//! A [`Library`] owns the collection and the deck list. Mutators publish the
//! new state immediately and persist it write-behind through a
//! [`KeyValueStore`]; derived views in [`views`] are recomputed from the
//! published state on demand. Card data comes from a [`CardResolver`].

pub mod clock;
pub mod collection;
pub mod config;
pub mod decklist;
pub mod decks;
pub mod library;
pub mod model;
pub mod resolver;
pub mod storage;
pub mod views;
pub mod workflow;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::{Collection, CollectionAction};
pub use config::{ConfigError, LibraryConfig};
pub use decks::{DeckAction, DeckList};
pub use library::Library;
#[cfg(feature = "emitter")]
pub use library::{ChangeNotice, ChangeScope};
pub use model::{
    Card, CollectionEntry, Condition, Deck, DeckEntry, DeckPatch, NewCollectionEntry, Prices, Zone,
};
pub use resolver::{CardResolver, InMemoryResolver, RateLimited, ResolveError};
#[cfg(feature = "scryfall")]
pub use resolver::{ScryfallClient, ScryfallConfig};
pub use storage::{Durability, InMemoryStore, JsonFileStore, KeyValueStore, Persistence, StorageError};
pub use workflow::{ImportReport, WorkflowError};
