//! Deck store: the deck list and its transitions.
//!
//! Like the collection, `DeckList` is a value; [`DeckList::apply`] computes
//! the next list. A transition that touches a deck refreshes that deck's
//! `updated_at` and copies every other deck over unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Deck, DeckEntry, DeckPatch, Zone};

/// A mutation of the deck list.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckAction {
    /// Append a new empty deck. The caller supplies the id.
    Create {
        id: String,
        name: String,
        format: String,
        description: Option<String>,
    },
    Delete {
        deck_id: String,
    },
    Update {
        deck_id: String,
        patch: DeckPatch,
    },
    /// Add copies. Accumulates onto an existing `(card_id, zone)` entry.
    AddCard {
        deck_id: String,
        entry: DeckEntry,
    },
    RemoveCard {
        deck_id: String,
        card_id: String,
        zone: Zone,
    },
    /// Set the quantity of one entry; `<= 0` removes it.
    SetCardQuantity {
        deck_id: String,
        card_id: String,
        zone: Zone,
        quantity: i64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckList {
    decks: Vec<Deck>,
}

impl DeckList {
    pub fn new(decks: Vec<Deck>) -> Self {
        DeckList { decks }
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Deck> {
        self.decks.iter()
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn get(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.id == deck_id)
    }

    /// Compute the deck list after `action`. `None` means nothing changed,
    /// which is what every action aimed at an unknown deck id produces.
    pub fn apply(&self, action: DeckAction, now: DateTime<Utc>) -> Option<DeckList> {
        match action {
            DeckAction::Create {
                id,
                name,
                format,
                description,
            } => {
                let mut decks = self.decks.clone();
                decks.push(Deck {
                    id,
                    name,
                    format,
                    description,
                    created_at: now,
                    updated_at: now,
                    cards: Vec::new(),
                });
                Some(DeckList { decks })
            }
            DeckAction::Delete { deck_id } => {
                self.get(&deck_id)?;
                let decks = self
                    .decks
                    .iter()
                    .filter(|deck| deck.id != deck_id)
                    .cloned()
                    .collect();
                Some(DeckList { decks })
            }
            DeckAction::Update { deck_id, patch } => {
                self.touch(&deck_id, now, |deck| patch.merge_into(deck))
            }
            DeckAction::AddCard { entry, .. } if entry.quantity == 0 => None,
            DeckAction::AddCard { deck_id, entry } => self.touch(&deck_id, now, |deck| {
                match deck
                    .cards
                    .iter_mut()
                    .find(|existing| existing.is_key(&entry.card_id, entry.zone))
                {
                    Some(existing) => {
                        existing.quantity = existing.quantity.saturating_add(entry.quantity)
                    }
                    None => deck.cards.push(entry),
                }
            }),
            DeckAction::RemoveCard {
                deck_id,
                card_id,
                zone,
            } => self.touch(&deck_id, now, |deck| {
                deck.cards.retain(|entry| !entry.is_key(&card_id, zone))
            }),
            DeckAction::SetCardQuantity {
                deck_id,
                card_id,
                zone,
                quantity,
            } if quantity <= 0 => self.apply(
                DeckAction::RemoveCard {
                    deck_id,
                    card_id,
                    zone,
                },
                now,
            ),
            DeckAction::SetCardQuantity {
                deck_id,
                card_id,
                zone,
                quantity,
            } => {
                let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                self.touch(&deck_id, now, |deck| {
                    if let Some(entry) = deck
                        .cards
                        .iter_mut()
                        .find(|entry| entry.is_key(&card_id, zone))
                    {
                        entry.quantity = quantity;
                    }
                })
            }
        }
    }

    fn touch<F>(&self, deck_id: &str, now: DateTime<Utc>, change: F) -> Option<DeckList>
    where
        F: FnOnce(&mut Deck),
    {
        let position = self.decks.iter().position(|deck| deck.id == deck_id)?;
        let mut decks = self.decks.clone();
        let deck = &mut decks[position];
        change(deck);
        deck.updated_at = now;
        Some(DeckList { decks })
    }
}

impl<'a> IntoIterator for &'a DeckList {
    type Item = &'a Deck;
    type IntoIter = std::slice::Iter<'a, Deck>;

    fn into_iter(self) -> Self::IntoIter {
        self.decks.iter()
    }
}
