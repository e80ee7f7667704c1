//! Collection store: the owned-card list and its transitions.
//!
//! `Collection` is an immutable value. Every mutation goes through
//! [`Collection::apply`], which returns the next list (or `None` when the
//! action changes nothing) and never touches the current one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CollectionEntry, NewCollectionEntry};

/// A mutation of the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction {
    /// Add copies. Accumulates onto an existing `(card_id, foil)` entry.
    Add(NewCollectionEntry),
    /// Remove every entry for a card id, foil or not.
    Remove { card_id: String },
    /// Set the quantity of every entry for a card id; `<= 0` removes them.
    SetQuantity { card_id: String, quantity: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    entries: Vec<CollectionEntry>,
}

impl Collection {
    pub fn new(entries: Vec<CollectionEntry>) -> Self {
        Collection { entries }
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollectionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any variant of the card is owned.
    pub fn contains(&self, card_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.card_id == card_id)
    }

    /// First entry for the card id, whichever foil state it has.
    pub fn get(&self, card_id: &str) -> Option<&CollectionEntry> {
        self.entries.iter().find(|entry| entry.card_id == card_id)
    }

    pub fn get_variant(&self, card_id: &str, foil: bool) -> Option<&CollectionEntry> {
        self.entries.iter().find(|entry| entry.is_variant(card_id, foil))
    }

    /// Copies owned across all variants of a card.
    pub fn owned_copies(&self, card_id: &str) -> u32 {
        self.entries
            .iter()
            .filter(|entry| entry.card_id == card_id)
            .map(|entry| entry.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Compute the collection after `action`. `None` means nothing changed.
    pub fn apply(&self, action: CollectionAction, now: DateTime<Utc>) -> Option<Collection> {
        match action {
            CollectionAction::Add(entry) => self.added(entry, now),
            CollectionAction::Remove { card_id } => self.removed(&card_id),
            CollectionAction::SetQuantity { card_id, quantity } if quantity <= 0 => {
                self.removed(&card_id)
            }
            CollectionAction::SetQuantity { card_id, quantity } => {
                let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                self.with_quantity(&card_id, quantity)
            }
        }
    }

    fn added(&self, entry: NewCollectionEntry, now: DateTime<Utc>) -> Option<Collection> {
        if entry.quantity == 0 {
            return None;
        }

        let mut entries = self.entries.clone();
        match entries
            .iter_mut()
            .find(|existing| existing.is_variant(&entry.card_id, entry.foil))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(entry.quantity);
            }
            None => entries.push(entry.into_entry(now)),
        }

        Some(Collection { entries })
    }

    fn removed(&self, card_id: &str) -> Option<Collection> {
        if !self.contains(card_id) {
            return None;
        }

        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.card_id != card_id)
            .cloned()
            .collect();

        Some(Collection { entries })
    }

    fn with_quantity(&self, card_id: &str, quantity: u32) -> Option<Collection> {
        if !self.contains(card_id) {
            return None;
        }

        let entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.card_id == card_id {
                    CollectionEntry {
                        quantity,
                        ..entry.clone()
                    }
                } else {
                    entry.clone()
                }
            })
            .collect();

        Some(Collection { entries })
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a CollectionEntry;
    type IntoIter = std::slice::Iter<'a, CollectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
