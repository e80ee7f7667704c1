use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::decks::DeckList;
use crate::model::Deck;

/// Card id to the names of the decks that hold it, in any zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckIndex {
    by_card: HashMap<String, Vec<String>>,
}

impl DeckIndex {
    /// Build the index in one pass over every deck entry. Deck names are
    /// deduplicated per card and kept in deck-list order.
    pub fn build(decks: &DeckList) -> Self {
        let mut by_card: HashMap<String, Vec<String>> = HashMap::new();
        for deck in decks {
            for entry in &deck.cards {
                let names = by_card.entry(entry.card_id.clone()).or_default();
                if !names.contains(&deck.name) {
                    names.push(deck.name.clone());
                }
            }
        }
        DeckIndex { by_card }
    }

    pub fn deck_names(&self, card_id: &str) -> &[String] {
        self.by_card
            .get(card_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.by_card.contains_key(card_id)
    }

    /// Number of distinct cards placed in at least one deck.
    pub fn len(&self) -> usize {
        self.by_card.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_card.is_empty()
    }
}

pub fn deck_index(decks: &DeckList) -> DeckIndex {
    DeckIndex::build(decks)
}

/// Decks that hold the card in any zone, in deck-list order.
pub fn decks_containing<'a>(decks: &'a DeckList, card_id: &str) -> Vec<&'a Deck> {
    decks.iter().filter(|deck| deck.contains_card(card_id)).collect()
}

/// Memoizes the [`DeckIndex`] for one published deck list.
///
/// Deck lists are replaced wholesale on every change, so the cache compares
/// list identity (`Arc::ptr_eq`), not contents. A new list always rebuilds.
#[derive(Debug, Default)]
pub struct DeckIndexCache {
    cached: Mutex<Option<(Arc<DeckList>, Arc<DeckIndex>)>>,
    rebuilds: AtomicUsize,
}

impl DeckIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, decks: &Arc<DeckList>) -> Arc<DeckIndex> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((list, index)) = cached.as_ref() {
            if Arc::ptr_eq(list, decks) {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(DeckIndex::build(decks));
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        *cached = Some((Arc::clone(decks), Arc::clone(&index)));
        index
    }

    /// How many times the index has been built.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds.load(Ordering::Relaxed)
    }
}
