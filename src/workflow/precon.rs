use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ImportReport, MissReason, WorkflowError};
use crate::library::Library;
use crate::model::{Card, Condition, Zone};
use crate::resolver::{resolve_batched, CardResolver};

/// A pre-built deck product, in the MTGJSON deck file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconDeck {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub commander: Vec<PreconCard>,
    #[serde(default)]
    pub main_board: Vec<PreconCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_board: Option<Vec<PreconCard>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreconCard {
    pub count: u32,
    pub name: String,
    #[serde(default)]
    pub identifiers: PreconIdentifiers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconIdentifiers {
    #[serde(default)]
    pub scryfall_id: Option<String>,
}

impl PreconDeck {
    /// Commander and main-board cards. The sideboard is not part of the
    /// playable product and is left out of imports.
    pub fn playable(&self) -> impl Iterator<Item = &PreconCard> {
        self.commander.iter().chain(self.main_board.iter())
    }

    /// Total copies across commander and main board.
    pub fn total_cards(&self) -> u32 {
        self.playable()
            .map(|card| card.count)
            .fold(0, u32::saturating_add)
    }

    fn counts_by_name(&self) -> HashMap<&str, u32> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for card in self.playable() {
            let count = counts.entry(card.name.as_str()).or_default();
            *count = count.saturating_add(card.count);
        }
        counts
    }

    fn counts_by_id(&self) -> HashMap<&str, u32> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for card in self.playable() {
            if let Some(id) = card.identifiers.scryfall_id.as_deref() {
                let count = counts.entry(id).or_default();
                *count = count.saturating_add(card.count);
            }
        }
        counts
    }

    fn commander_names(&self) -> HashSet<&str> {
        self.commander.iter().map(|card| card.name.as_str()).collect()
    }
}

struct Resolved<'a> {
    cards: Vec<Card>,
    by_id: HashMap<&'a str, u32>,
    by_name: HashMap<&'a str, u32>,
    report: ImportReport,
}

impl Resolved<'_> {
    /// Copies listed for a resolved card: by id, then by name, else one.
    fn quantity(&self, card: &Card) -> u32 {
        self.by_id
            .get(card.id.as_str())
            .or_else(|| self.by_name.get(card.name.as_str()))
            .copied()
            .unwrap_or(1)
    }
}

async fn resolve_precon<'a, R>(
    resolver: &R,
    precon: &'a PreconDeck,
    batch_size: usize,
) -> Result<Resolved<'a>, WorkflowError>
where
    R: CardResolver + ?Sized,
{
    let mut report = ImportReport::default();
    let mut ids = Vec::new();
    for card in precon.playable() {
        match card.identifiers.scryfall_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => ids.push(id.to_string()),
            None => report.miss(card.name.clone(), MissReason::NotFound),
        }
    }

    let cards = resolve_batched(resolver, &ids, batch_size).await?;

    let found: HashSet<&str> = cards.iter().map(|card| card.id.as_str()).collect();
    let mut reported = HashSet::new();
    for card in precon.playable() {
        if let Some(id) = card.identifiers.scryfall_id.as_deref() {
            if !id.is_empty() && !found.contains(id) && reported.insert(id) {
                report.miss(card.name.clone(), MissReason::NotFound);
            }
        }
    }

    Ok(Resolved {
        cards,
        by_id: precon.counts_by_id(),
        by_name: precon.counts_by_name(),
        report,
    })
}

/// Add every card of a precon to the collection as non-foil near-mint copies.
/// Ids are resolved in batches of `batch_size`.
pub async fn add_precon_to_collection<R>(
    library: &mut Library,
    resolver: &R,
    precon: &PreconDeck,
    batch_size: usize,
) -> Result<ImportReport, WorkflowError>
where
    R: CardResolver + ?Sized,
{
    let resolved = resolve_precon(resolver, precon, batch_size).await?;

    let mut report = resolved.report.clone();
    for card in &resolved.cards {
        let entry = card.to_collection_entry(resolved.quantity(card), false, Condition::NearMint);
        library.add_to_collection(entry).wait().await?;
        report.added += 1;
    }

    info!(precon = %precon.name, added = report.added, "precon added to collection");
    Ok(report)
}

/// Create a commander deck from a precon and add the cards not owned yet to
/// the collection.
pub async fn import_precon_as_deck<R>(
    library: &mut Library,
    resolver: &R,
    precon: &PreconDeck,
    batch_size: usize,
) -> Result<ImportReport, WorkflowError>
where
    R: CardResolver + ?Sized,
{
    if precon.name.trim().is_empty() {
        return Err(WorkflowError::InvalidInput("precon has no name".into()));
    }
    let resolved = resolve_precon(resolver, precon, batch_size).await?;
    let commanders = precon.commander_names();

    let (deck, durability) = library.create_deck(
        precon.name.clone(),
        "commander",
        Some(format!("Precon: {}", precon.name)),
    );
    durability.wait().await?;

    let mut report = ImportReport {
        deck_id: Some(deck.id.clone()),
        ..resolved.report.clone()
    };

    for card in &resolved.cards {
        let quantity = resolved.quantity(card);
        let zone = if commanders.contains(card.name.as_str()) {
            Zone::Commander
        } else {
            Zone::Main
        };

        library
            .add_card_to_deck(&deck.id, card.to_deck_entry(quantity, zone))
            .wait()
            .await?;
        if !library.is_in_collection(&card.id) {
            library
                .add_to_collection(card.to_collection_entry(quantity, false, Condition::NearMint))
                .wait()
                .await?;
        }
        report.added += 1;
    }

    info!(
        precon = %precon.name,
        deck_id = %deck.id,
        added = report.added,
        unresolved = report.unresolved.len(),
        "precon imported as deck"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_mtgjson_layout() {
        let precon: PreconDeck = serde_json::from_value(json!({
            "code": "C21",
            "name": "Arcane Maelstrom",
            "releaseDate": "2021-04-23",
            "type": "Commander Deck",
            "commander": [
                { "count": 1, "name": "Kalamax, the Stormsire", "uuid": "u1",
                  "identifiers": { "scryfallId": "kalamax" } }
            ],
            "mainBoard": [
                { "count": 1, "name": "Sol Ring", "identifiers": { "scryfallId": "sol" } },
                { "count": 7, "name": "Island", "identifiers": { "scryfallId": "island-a" } },
                { "count": 4, "name": "Island", "identifiers": { "scryfallId": "island-b" } }
            ]
        }))
        .unwrap();

        assert_eq!(precon.total_cards(), 13);
        assert_eq!(precon.counts_by_name().get("Island"), Some(&11));
        assert_eq!(precon.counts_by_id().get("island-b"), Some(&4));
        assert!(precon.side_board.is_none());
        assert!(precon.commander_names().contains("Kalamax, the Stormsire"));
    }
}
