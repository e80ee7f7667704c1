//! Aggregate statistics. Every function here is a pure reduction; a missing
//! price counts as zero and never fails a total.

use std::collections::{BTreeMap, HashMap};

use crate::collection::Collection;
use crate::model::{Card, Deck, Prices, Zone};

use super::cards::{mana_value, TypeGroup};

/// Highest mana-value bucket of [`mana_curve`]; it also holds everything above.
pub const CURVE_CAP: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Copies across every entry.
    pub total_cards: u32,
    /// Entries, so a foil and a non-foil copy of a card count twice.
    pub unique_cards: usize,
    pub foil_cards: u32,
}

pub fn collection_stats(collection: &Collection) -> CollectionStats {
    collection
        .iter()
        .fold(CollectionStats::default(), |mut stats, entry| {
            stats.total_cards = stats.total_cards.saturating_add(entry.quantity);
            stats.unique_cards += 1;
            if entry.foil {
                stats.foil_cards = stats.foil_cards.saturating_add(entry.quantity);
            }
            stats
        })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneCounts {
    pub main: u32,
    pub sideboard: u32,
    pub commander: u32,
}

impl ZoneCounts {
    pub fn get(&self, zone: Zone) -> u32 {
        match zone {
            Zone::Main => self.main,
            Zone::Sideboard => self.sideboard,
            Zone::Commander => self.commander,
        }
    }

    pub fn total(&self) -> u32 {
        self.main
            .saturating_add(self.sideboard)
            .saturating_add(self.commander)
    }
}

pub fn zone_counts(deck: &Deck) -> ZoneCounts {
    ZoneCounts {
        main: deck.zone_count(Zone::Main),
        sideboard: deck.zone_count(Zone::Sideboard),
        commander: deck.zone_count(Zone::Commander),
    }
}

/// Copies per mana value in the main zone, lands excluded. Index `n` holds
/// mana value `n`; the last bucket collects [`CURVE_CAP`] and above.
pub fn mana_curve(deck: &Deck) -> [u32; CURVE_CAP + 1] {
    let mut curve = [0u32; CURVE_CAP + 1];
    for entry in deck.zone_entries(Zone::Main) {
        if TypeGroup::of(entry.type_line.as_deref()) == TypeGroup::Land {
            continue;
        }
        let bucket = (mana_value(entry.mana_cost.as_deref()) as usize).min(CURVE_CAP);
        curve[bucket] = curve[bucket].saturating_add(entry.quantity);
    }
    curve
}

/// Copies per color symbol in the main zone. Multicolored cards count once
/// for each of their colors; colorless cards are not counted.
pub fn color_distribution(deck: &Deck) -> BTreeMap<String, u32> {
    let mut colors: BTreeMap<String, u32> = BTreeMap::new();
    for entry in deck.zone_entries(Zone::Main) {
        for color in entry.colors.iter().flatten() {
            let count = colors.entry(color.clone()).or_default();
            *count = count.saturating_add(entry.quantity);
        }
    }
    colors
}

/// Current prices keyed by card id, usually filled from a batch lookup.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    prices: HashMap<String, Prices>,
}

impl PriceBook {
    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let prices = cards
            .into_iter()
            .map(|card| (card.id.clone(), card.prices.clone()))
            .collect();
        PriceBook { prices }
    }

    pub fn insert(&mut self, card_id: impl Into<String>, prices: Prices) {
        self.prices.insert(card_id.into(), prices);
    }

    pub fn get(&self, card_id: &str) -> Option<&Prices> {
        self.prices.get(card_id)
    }

    /// USD price of one copy, or zero when the card or its price is unknown.
    pub fn unit_price(&self, card_id: &str, foil: bool) -> f64 {
        self.get(card_id)
            .and_then(|prices| prices.value_for(foil))
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl<'a> FromIterator<&'a Card> for PriceBook {
    fn from_iter<I: IntoIterator<Item = &'a Card>>(cards: I) -> Self {
        PriceBook::from_cards(cards)
    }
}

/// Estimated USD value of every zone of a deck at regular prices.
pub fn deck_value(deck: &Deck, prices: &PriceBook) -> f64 {
    deck.cards
        .iter()
        .map(|entry| prices.unit_price(&entry.card_id, false) * f64::from(entry.quantity))
        .sum()
}

/// Estimated USD value of the collection; foil entries use the foil price.
pub fn collection_value(collection: &Collection, prices: &PriceBook) -> f64 {
    collection
        .iter()
        .map(|entry| prices.unit_price(&entry.card_id, entry.foil) * f64::from(entry.quantity))
        .sum()
}
