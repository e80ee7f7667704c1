//! Persisted entities: collection entries, decks and their entries, plus the
//! resolved card record they are built from.
//!
//! Field names on the wire are camelCase and must stay stable; data written by
//! earlier versions is read back verbatim.

mod card;
mod collection_entry;
mod deck;
pub(crate) mod timestamp;

pub use card::{Card, Prices};
pub use collection_entry::{CollectionEntry, Condition, NewCollectionEntry};
pub use deck::{Deck, DeckEntry, DeckPatch, Zone};
