//! The library: one owned container for the collection and the deck list.
//!
//! Mutators take `&mut self`, compute the next state with the pure
//! transitions in [`crate::collection`] and [`crate::decks`], publish it,
//! notify observers and only then queue the write. A read right after a
//! mutator always sees the new state, whether or not the write has landed.

#[cfg(feature = "emitter")]
mod events;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::collection::{Collection, CollectionAction};
use crate::config::LibraryConfig;
use crate::decks::{DeckAction, DeckList};
use crate::model::{CollectionEntry, Deck, DeckEntry, DeckPatch, NewCollectionEntry, Zone};
use crate::storage::{Durability, Persistence, StorageError, WriteBehind};
use crate::views::{self, DeckIndex, DeckIndexCache};

#[cfg(feature = "emitter")]
pub use events::{ChangeNotice, ChangeScope};
#[cfg(feature = "emitter")]
use events::ChangeEvents;

pub struct Library {
    collection: Arc<Collection>,
    decks: Arc<DeckList>,
    collection_revision: u64,
    decks_revision: u64,
    collection_key: String,
    decks_key: String,
    writer: WriteBehind,
    clock: Arc<dyn Clock>,
    index: DeckIndexCache,
    #[cfg(feature = "emitter")]
    events: ChangeEvents,
}

impl Library {
    /// Load both stores through `persistence` and start the write-behind
    /// worker. Absent or unreadable values start out empty. Must be called
    /// inside a tokio runtime.
    pub async fn open(persistence: Persistence, config: &LibraryConfig) -> Self {
        let collection: Collection = persistence
            .get_or(&config.collection_key, Collection::default())
            .await;
        let decks: DeckList = persistence.get_or(&config.decks_key, DeckList::default()).await;

        info!(
            attached = persistence.is_attached(),
            collection = collection.len(),
            decks = decks.len(),
            "library opened"
        );

        Library {
            collection: Arc::new(collection),
            decks: Arc::new(decks),
            collection_revision: 0,
            decks_revision: 0,
            collection_key: config.collection_key.clone(),
            decks_key: config.decks_key.clone(),
            writer: WriteBehind::spawn(persistence),
            clock: Arc::new(SystemClock),
            index: DeckIndexCache::new(),
            #[cfg(feature = "emitter")]
            events: ChangeEvents::new(),
        }
    }

    /// A library with no persistence; nothing survives the process.
    pub async fn in_memory() -> Self {
        Self::open(Persistence::detached(), &LibraryConfig::default()).await
    }

    /// Replace the time source used for `added_at`, `created_at` and
    /// `updated_at`.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    // Collection

    pub fn add_to_collection(&mut self, entry: NewCollectionEntry) -> Durability {
        debug!(
            card_id = %entry.card_id,
            foil = entry.foil,
            quantity = entry.quantity,
            "add to collection"
        );
        self.apply_collection(CollectionAction::Add(entry))
    }

    /// Removes every variant of the card, foil and non-foil alike.
    pub fn remove_from_collection(&mut self, card_id: &str) -> Durability {
        debug!(card_id, "remove from collection");
        self.apply_collection(CollectionAction::Remove {
            card_id: card_id.to_string(),
        })
    }

    /// Set the quantity of every variant of the card. Zero or less removes it.
    pub fn update_card_quantity(&mut self, card_id: &str, quantity: i64) -> Durability {
        debug!(card_id, quantity, "update collection quantity");
        self.apply_collection(CollectionAction::SetQuantity {
            card_id: card_id.to_string(),
            quantity,
        })
    }

    pub fn is_in_collection(&self, card_id: &str) -> bool {
        self.collection.contains(card_id)
    }

    pub fn get_collection_card(&self, card_id: &str) -> Option<&CollectionEntry> {
        self.collection.get(card_id)
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// The published collection. Stays valid and unchanged after later
    /// mutations.
    pub fn collection_snapshot(&self) -> Arc<Collection> {
        Arc::clone(&self.collection)
    }

    // Decks

    /// Create an empty deck. It is in the deck list when this returns.
    pub fn create_deck(
        &mut self,
        name: impl Into<String>,
        format: impl Into<String>,
        description: Option<String>,
    ) -> (Deck, Durability) {
        let now = self.clock.now();
        let deck = Deck {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            format: format.into(),
            description,
            created_at: now,
            updated_at: now,
            cards: Vec::new(),
        };
        debug!(deck_id = %deck.id, name = %deck.name, "create deck");

        let durability = self.apply_decks_at(
            DeckAction::Create {
                id: deck.id.clone(),
                name: deck.name.clone(),
                format: deck.format.clone(),
                description: deck.description.clone(),
            },
            now,
        );
        let deck = self.decks.get(&deck.id).cloned().unwrap_or(deck);
        (deck, durability)
    }

    pub fn delete_deck(&mut self, deck_id: &str) -> Durability {
        debug!(deck_id, "delete deck");
        self.apply_decks(DeckAction::Delete {
            deck_id: deck_id.to_string(),
        })
    }

    pub fn update_deck(&mut self, deck_id: &str, patch: DeckPatch) -> Durability {
        debug!(deck_id, "update deck");
        self.apply_decks(DeckAction::Update {
            deck_id: deck_id.to_string(),
            patch,
        })
    }

    pub fn add_card_to_deck(&mut self, deck_id: &str, entry: DeckEntry) -> Durability {
        debug!(
            deck_id,
            card_id = %entry.card_id,
            zone = %entry.zone,
            quantity = entry.quantity,
            "add card to deck"
        );
        self.apply_decks(DeckAction::AddCard {
            deck_id: deck_id.to_string(),
            entry,
        })
    }

    pub fn remove_card_from_deck(&mut self, deck_id: &str, card_id: &str, zone: Zone) -> Durability {
        debug!(deck_id, card_id, %zone, "remove card from deck");
        self.apply_decks(DeckAction::RemoveCard {
            deck_id: deck_id.to_string(),
            card_id: card_id.to_string(),
            zone,
        })
    }

    pub fn update_deck_card_quantity(
        &mut self,
        deck_id: &str,
        card_id: &str,
        zone: Zone,
        quantity: i64,
    ) -> Durability {
        debug!(deck_id, card_id, %zone, quantity, "update deck card quantity");
        self.apply_decks(DeckAction::SetCardQuantity {
            deck_id: deck_id.to_string(),
            card_id: card_id.to_string(),
            zone,
            quantity,
        })
    }

    pub fn get_deck(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.get(deck_id)
    }

    pub fn decks(&self) -> &DeckList {
        &self.decks
    }

    pub fn decks_snapshot(&self) -> Arc<DeckList> {
        Arc::clone(&self.decks)
    }

    // Views

    /// Card id to deck names, rebuilt only when the deck list has changed.
    pub fn deck_index(&self) -> Arc<DeckIndex> {
        self.index.get(&self.decks)
    }

    pub fn decks_containing(&self, card_id: &str) -> Vec<&Deck> {
        views::decks_containing(&self.decks, card_id)
    }

    /// Bumped every time a new collection is published.
    pub fn collection_revision(&self) -> u64 {
        self.collection_revision
    }

    pub fn decks_revision(&self) -> u64 {
        self.decks_revision
    }

    // Lifecycle

    /// Empty both stores and clear the persistence port.
    pub fn reset(&mut self) -> Durability {
        info!("library reset");
        self.collection = Arc::new(Collection::default());
        self.collection_revision += 1;
        self.decks = Arc::new(DeckList::default());
        self.decks_revision += 1;
        #[cfg(feature = "emitter")]
        {
            self.notify(ChangeScope::Collection);
            self.notify(ChangeScope::Decks);
        }
        self.writer.clear()
    }

    /// Wait until every write queued so far has finished.
    pub async fn flush(&self) -> Result<(), StorageError> {
        self.writer.flush().await
    }

    /// Register an observer for changes in `scope`. Returns an id for
    /// [`Library::remove_listener`].
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&mut self, scope: ChangeScope, listener: F) -> String
    where
        F: Fn(ChangeNotice) + Send + Sync + 'static,
    {
        self.events.on(scope, listener)
    }

    #[cfg(feature = "emitter")]
    pub fn remove_listener(&mut self, id: &str) {
        self.events.remove_listener(id);
    }

    fn apply_collection(&mut self, action: CollectionAction) -> Durability {
        let Some(next) = self.collection.apply(action, self.clock.now()) else {
            return Durability::settled();
        };
        self.collection = Arc::new(next);
        self.collection_revision += 1;
        #[cfg(feature = "emitter")]
        self.notify(ChangeScope::Collection);
        self.writer.put(&self.collection_key, self.collection.as_ref())
    }

    fn apply_decks(&mut self, action: DeckAction) -> Durability {
        let now = self.clock.now();
        self.apply_decks_at(action, now)
    }

    fn apply_decks_at(&mut self, action: DeckAction, now: DateTime<Utc>) -> Durability {
        let Some(next) = self.decks.apply(action, now) else {
            return Durability::settled();
        };
        self.decks = Arc::new(next);
        self.decks_revision += 1;
        #[cfg(feature = "emitter")]
        self.notify(ChangeScope::Decks);
        self.writer.put(&self.decks_key, self.decks.as_ref())
    }

    #[cfg(feature = "emitter")]
    fn notify(&mut self, scope: ChangeScope) {
        let (revision, len) = match scope {
            ChangeScope::Collection => (self.collection_revision, self.collection.len()),
            ChangeScope::Decks => (self.decks_revision, self.decks.len()),
        };
        self.events.emit(ChangeNotice {
            scope,
            revision,
            len,
        });
    }
}
