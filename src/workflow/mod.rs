//! Composite operations that span the collection, the deck list and a
//! card resolver.
//!
//! Each workflow is a plain sequence of library calls. Nothing is atomic
//! across them: a failure part way through leaves the earlier steps applied
//! and the stores valid. Lookup misses are collected in an [`ImportReport`]
//! and never stop a workflow; a failed write does.

mod error;
mod precon;

use tracing::{info, warn};

use crate::decklist;
use crate::library::Library;
use crate::model::{Card, Condition, Zone};
use crate::resolver::CardResolver;

pub use error::WorkflowError;
pub use precon::{
    add_precon_to_collection, import_precon_as_deck, PreconCard, PreconDeck, PreconIdentifiers,
};

/// Why a card could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The resolver has no such card.
    NotFound,
    /// The lookup itself failed.
    Lookup(String),
    /// The line asked for zero copies.
    ZeroQuantity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedCard {
    pub name: String,
    pub reason: MissReason,
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// The deck the import created, if it created one.
    pub deck_id: Option<String>,
    /// Cards placed, one per resolved line or card.
    pub added: usize,
    pub unresolved: Vec<UnresolvedCard>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    fn miss(&mut self, name: impl Into<String>, reason: MissReason) {
        let name = name.into();
        warn!(card = %name, ?reason, "card not imported");
        self.unresolved.push(UnresolvedCard { name, reason });
    }
}

/// Create a deck from deck list text, resolving each line by name.
///
/// When no line lands in the commander zone, the first card is moved there.
/// Lines are resolved one after another; a miss, a failed lookup or a
/// zero-copy line is recorded and the next line is processed.
pub async fn import_deck_list<R>(
    library: &mut Library,
    resolver: &R,
    name: &str,
    format: &str,
    text: &str,
) -> Result<ImportReport, WorkflowError>
where
    R: CardResolver + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(WorkflowError::InvalidInput("deck name is empty".into()));
    }
    let mut lines = decklist::parse(text);
    if lines.is_empty() {
        return Err(WorkflowError::InvalidInput("deck list has no cards".into()));
    }
    if !lines.iter().any(|line| line.zone == Zone::Commander) {
        lines[0].zone = Zone::Commander;
    }

    let (deck, durability) = library.create_deck(name, format, None);
    durability.wait().await?;

    let mut report = ImportReport {
        deck_id: Some(deck.id.clone()),
        ..ImportReport::default()
    };

    for line in lines {
        if line.quantity == 0 {
            report.miss(line.name, MissReason::ZeroQuantity);
            continue;
        }
        let card = match resolver.card_named(&line.name).await {
            Ok(Some(card)) => card,
            Ok(None) => {
                report.miss(line.name, MissReason::NotFound);
                continue;
            }
            Err(err) => {
                report.miss(line.name, MissReason::Lookup(err.to_string()));
                continue;
            }
        };

        library
            .add_card_to_deck(&deck.id, card.to_deck_entry(line.quantity, line.zone))
            .wait()
            .await?;
        report.added += 1;
    }

    info!(
        deck_id = %deck.id,
        added = report.added,
        unresolved = report.unresolved.len(),
        "deck list imported"
    );
    Ok(report)
}

/// Add a card to a deck, then add one non-foil near-mint copy per deck copy
/// to the collection if the card is not owned yet.
pub async fn add_to_deck_and_collection(
    library: &mut Library,
    deck_id: &str,
    card: &Card,
    quantity: u32,
    zone: Zone,
) -> Result<(), WorkflowError> {
    if quantity == 0 {
        return Err(WorkflowError::InvalidInput("quantity must be at least 1".into()));
    }
    if library.get_deck(deck_id).is_none() {
        return Err(WorkflowError::UnknownDeck(deck_id.to_string()));
    }

    library
        .add_card_to_deck(deck_id, card.to_deck_entry(quantity, zone))
        .wait()
        .await?;

    if !library.is_in_collection(&card.id) {
        library
            .add_to_collection(card.to_collection_entry(quantity, false, Condition::NearMint))
            .wait()
            .await?;
    }
    Ok(())
}
