use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partition of a deck's card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Main,
    Sideboard,
    Commander,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Main, Zone::Sideboard, Zone::Commander];

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Main => "main",
            Zone::Sideboard => "sideboard",
            Zone::Commander => "commander",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card placed in one zone of a deck, keyed by `(card_id, zone)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    #[serde(rename = "scryfallId")]
    pub card_id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(rename = "board")]
    pub zone: Zone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl DeckEntry {
    /// A bare entry with no display attributes.
    pub fn new(card_id: impl Into<String>, name: impl Into<String>, quantity: u32, zone: Zone) -> Self {
        DeckEntry {
            card_id: card_id.into(),
            name: name.into(),
            quantity,
            zone,
            image_uri: None,
            mana_cost: None,
            type_line: None,
            colors: None,
        }
    }

    pub fn is_key(&self, card_id: &str, zone: Zone) -> bool {
        self.card_id == card_id && self.zone == zone
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<DeckEntry>,
}

impl Deck {
    pub fn entry(&self, card_id: &str, zone: Zone) -> Option<&DeckEntry> {
        self.cards.iter().find(|entry| entry.is_key(card_id, zone))
    }

    pub fn contains_card(&self, card_id: &str) -> bool {
        self.cards.iter().any(|entry| entry.card_id == card_id)
    }

    pub fn zone_entries(&self, zone: Zone) -> impl Iterator<Item = &DeckEntry> {
        self.cards.iter().filter(move |entry| entry.zone == zone)
    }

    /// Copies in `zone`, saturating at `u32::MAX`.
    pub fn zone_count(&self, zone: Zone) -> u32 {
        self.zone_entries(zone)
            .map(|entry| entry.quantity)
            .fold(0, u32::saturating_add)
    }

    pub fn total_cards(&self) -> u32 {
        self.cards
            .iter()
            .map(|entry| entry.quantity)
            .fold(0, u32::saturating_add)
    }
}

/// Metadata fields to merge into a deck. `None` leaves a field alone;
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckPatch {
    pub name: Option<String>,
    pub format: Option<String>,
    pub description: Option<Option<String>>,
}

impl DeckPatch {
    pub fn name(name: impl Into<String>) -> Self {
        DeckPatch {
            name: Some(name.into()),
            ..DeckPatch::default()
        }
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub(crate) fn merge_into(self, deck: &mut Deck) {
        if let Some(name) = self.name {
            deck.name = name;
        }
        if let Some(format) = self.format {
            deck.format = format;
        }
        if let Some(description) = self.description {
            deck.description = description;
        }
    }
}
