//! Card reference resolvers.
//!
//! The stores never talk to a card database directly; workflows go through
//! [`CardResolver`]. Each operation can fail independently, and a miss is an
//! `Ok(None)` (or a shorter batch), not an error.

mod error;
mod in_memory;
mod rate_limit;
#[cfg(feature = "scryfall")]
mod scryfall;

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::model::Card;

pub use error::ResolveError;
pub use in_memory::InMemoryResolver;
pub use rate_limit::{RateLimited, DEFAULT_MIN_INTERVAL};
#[cfg(feature = "scryfall")]
pub use scryfall::{ScryfallClient, ScryfallConfig};

/// Most identifiers a single batch lookup may carry.
pub const MAX_BATCH: usize = 75;

#[async_trait]
pub trait CardResolver: Send + Sync {
    /// Look up one card by id.
    async fn card(&self, id: &str) -> Result<Option<Card>, ResolveError>;

    /// Look up at most [`MAX_BATCH`] ids in one call. Unknown ids are left
    /// out, so the result may be shorter and is not positionally aligned.
    async fn cards(&self, ids: &[String]) -> Result<Vec<Card>, ResolveError>;

    /// Look up a card by exact name, falling back to a fuzzy match.
    async fn card_named(&self, name: &str) -> Result<Option<Card>, ResolveError>;
}

/// Resolve any number of ids by splitting them into batches of `batch_size`
/// (clamped to `1..=MAX_BATCH`) and awaiting each batch in turn. Duplicate ids
/// are requested once; results are concatenated in batch order.
pub async fn resolve_batched<R>(
    resolver: &R,
    ids: &[String],
    batch_size: usize,
) -> Result<Vec<Card>, ResolveError>
where
    R: CardResolver + ?Sized,
{
    let mut seen = HashSet::new();
    let unique: Vec<String> = ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    let batch_size = batch_size.clamp(1, MAX_BATCH);
    let mut resolved = Vec::with_capacity(unique.len());
    for (n, batch) in unique.chunks(batch_size).enumerate() {
        let cards = resolver.cards(batch).await?;
        debug!(batch = n, requested = batch.len(), resolved = cards.len(), "resolved batch");
        resolved.extend(cards);
    }

    Ok(resolved)
}
