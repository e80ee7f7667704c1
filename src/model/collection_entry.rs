use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical condition grade of an owned card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "M")]
    Mint,
    #[default]
    #[serde(rename = "NM")]
    NearMint,
    #[serde(rename = "LP")]
    LightlyPlayed,
    #[serde(rename = "MP")]
    ModeratelyPlayed,
    #[serde(rename = "HP")]
    HeavilyPlayed,
    #[serde(rename = "DMG")]
    Damaged,
}

/// An owned card, keyed by `(card_id, foil)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    #[serde(rename = "scryfallId")]
    pub card_id: String,
    pub name: String,
    pub set: String,
    pub set_name: String,
    pub quantity: u32,
    pub foil: bool,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(with = "super::timestamp")]
    pub added_at: DateTime<Utc>,
}

impl CollectionEntry {
    pub fn is_variant(&self, card_id: &str, foil: bool) -> bool {
        self.card_id == card_id && self.foil == foil
    }
}

/// Everything needed to add a card to the collection; the store stamps `added_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollectionEntry {
    pub card_id: String,
    pub name: String,
    pub set: String,
    pub set_name: String,
    pub quantity: u32,
    pub foil: bool,
    pub condition: Condition,
    pub image_uri: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: String,
    pub colors: Vec<String>,
}

impl NewCollectionEntry {
    pub fn into_entry(self, added_at: DateTime<Utc>) -> CollectionEntry {
        CollectionEntry {
            card_id: self.card_id,
            name: self.name,
            set: self.set,
            set_name: self.set_name,
            quantity: self.quantity,
            foil: self.foil,
            condition: self.condition,
            image_uri: self.image_uri,
            mana_cost: self.mana_cost,
            type_line: self.type_line,
            colors: self.colors,
            added_at,
        }
    }
}
