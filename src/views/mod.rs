//! Derived views over the collection and the deck list.
//!
//! Nothing here is stored. Each function reads the current state and returns
//! a fresh answer, so results can never disagree with the data they came from.

mod cards;
mod index;
mod stats;

use crate::collection::Collection;
use crate::model::{CollectionEntry, Deck, DeckEntry};

pub use cards::{group_by_type, mana_value, sort_decks, sort_entries, DeckSort, SortMode, TypeGroup};
pub use index::{deck_index, decks_containing, DeckIndex, DeckIndexCache};
pub use stats::{
    collection_stats, collection_value, color_distribution, deck_value, mana_curve, zone_counts,
    CollectionStats, PriceBook, ZoneCounts, CURVE_CAP,
};

/// Copies of a card owned across every variant.
pub fn owned_copies(collection: &Collection, card_id: &str) -> u32 {
    collection.owned_copies(card_id)
}

/// Deck entries whose card is not owned in any variant.
pub fn missing_from_collection<'a>(deck: &'a Deck, collection: &Collection) -> Vec<&'a DeckEntry> {
    deck.cards
        .iter()
        .filter(|entry| !collection.contains(&entry.card_id))
        .collect()
}

/// Narrowing applied when browsing the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionFilter {
    /// Case-insensitive text matched against name, set name and type line.
    pub query: Option<String>,
    /// Color symbol the card must include, such as `"G"`.
    pub color: Option<String>,
}

/// Matching entries sorted by name.
pub fn filter_collection<'a>(
    collection: &'a Collection,
    filter: &CollectionFilter,
) -> Vec<&'a CollectionEntry> {
    let query = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut matches: Vec<&CollectionEntry> = collection
        .iter()
        .filter(|entry| match &query {
            Some(q) => {
                entry.name.to_lowercase().contains(q)
                    || entry.set_name.to_lowercase().contains(q)
                    || entry.type_line.to_lowercase().contains(q)
            }
            None => true,
        })
        .filter(|entry| match &filter.color {
            Some(color) => entry.colors.contains(color),
            None => true,
        })
        .collect();

    matches.sort_by(|a, b| cards::compare_names(&a.name, &b.name));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionAction;
    use crate::model::{Condition, NewCollectionEntry, Zone};
    use chrono::Utc;

    fn owned(card_id: &str, name: &str, type_line: &str, colors: &[&str]) -> CollectionAction {
        CollectionAction::Add(NewCollectionEntry {
            card_id: card_id.into(),
            name: name.into(),
            set: "tst".into(),
            set_name: "Test Set".into(),
            quantity: 1,
            foil: false,
            condition: Condition::NearMint,
            image_uri: None,
            mana_cost: None,
            type_line: type_line.into(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        })
    }

    fn collection() -> Collection {
        let now = Utc::now();
        [
            owned("elf", "Llanowar Elves", "Creature - Elf Druid", &["G"]),
            owned("bolt", "Lightning Bolt", "Instant", &["R"]),
            owned("growth", "Giant Growth", "Instant", &["G"]),
        ]
        .into_iter()
        .fold(Collection::default(), |acc, action| acc.apply(action, now).unwrap())
    }

    #[test]
    fn filter_by_text_and_color() {
        let collection = collection();

        let instants = filter_collection(
            &collection,
            &CollectionFilter {
                query: Some("INSTANT".into()),
                color: None,
            },
        );
        let names: Vec<_> = instants.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Giant Growth", "Lightning Bolt"]);

        let green_instants = filter_collection(
            &collection,
            &CollectionFilter {
                query: Some("instant".into()),
                color: Some("G".into()),
            },
        );
        assert_eq!(green_instants.len(), 1);

        assert_eq!(filter_collection(&collection, &CollectionFilter::default()).len(), 3);
    }

    #[test]
    fn missing_cards() {
        let now = Utc::now();
        let deck = Deck {
            id: "d".into(),
            name: "Stompy".into(),
            format: "pauper".into(),
            description: None,
            created_at: now,
            updated_at: now,
            cards: vec![
                DeckEntry::new("elf", "Llanowar Elves", 4, Zone::Main),
                DeckEntry::new("rancor", "Rancor", 4, Zone::Main),
            ],
        };
        let missing = missing_from_collection(&deck, &collection());
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].card_id, "rancor");
        assert_eq!(owned_copies(&collection(), "elf"), 1);
    }
}
