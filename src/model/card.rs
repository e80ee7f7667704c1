use serde::{Deserialize, Serialize};

use super::{Condition, DeckEntry, NewCollectionEntry, Zone};

/// Market prices as strings, exactly as card databases publish them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prices {
    #[serde(default)]
    pub usd: Option<String>,
    #[serde(default)]
    pub usd_foil: Option<String>,
    #[serde(default)]
    pub eur: Option<String>,
    #[serde(default)]
    pub eur_foil: Option<String>,
}

impl Prices {
    pub fn usd_value(&self) -> Option<f64> {
        parse_price(self.usd.as_deref())
    }

    pub fn usd_foil_value(&self) -> Option<f64> {
        parse_price(self.usd_foil.as_deref())
    }

    pub fn eur_value(&self) -> Option<f64> {
        parse_price(self.eur.as_deref())
    }

    /// USD price for one copy. Foil copies use the foil price and fall back
    /// to the regular one when no foil price is listed.
    pub fn value_for(&self, foil: bool) -> Option<f64> {
        if foil {
            self.usd_foil_value().or_else(|| self.usd_value())
        } else {
            self.usd_value()
        }
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw?.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// A normalized card record returned by a resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub set: String,
    pub set_name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub prices: Prices,
}

impl Card {
    /// Face colors, or the color identity for cards that carry colors per face.
    pub fn display_colors(&self) -> Vec<String> {
        self.colors
            .clone()
            .unwrap_or_else(|| self.color_identity.clone())
    }

    pub fn to_collection_entry(
        &self,
        quantity: u32,
        foil: bool,
        condition: Condition,
    ) -> NewCollectionEntry {
        NewCollectionEntry {
            card_id: self.id.clone(),
            name: self.name.clone(),
            set: self.set.clone(),
            set_name: self.set_name.clone(),
            quantity,
            foil,
            condition,
            image_uri: self.image_uri.clone(),
            mana_cost: self.mana_cost.clone(),
            type_line: self.type_line.clone(),
            colors: self.display_colors(),
        }
    }

    pub fn to_deck_entry(&self, quantity: u32, zone: Zone) -> DeckEntry {
        DeckEntry {
            card_id: self.id.clone(),
            name: self.name.clone(),
            quantity,
            zone,
            image_uri: self.image_uri.clone(),
            mana_cost: self.mana_cost.clone(),
            type_line: Some(self.type_line.clone()),
            colors: Some(self.display_colors()),
        }
    }
}
