//! InMemoryResolver - resolves against a fixed card list.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{CardResolver, ResolveError, MAX_BATCH};
use crate::model::Card;

/// Resolver over a fixed set of cards, for tests and offline use.
///
/// Name lookup tries an exact match, then a case-insensitive match, then the
/// shortest name containing the query. Names registered with
/// [`InMemoryResolver::failing_on`] produce a transport error instead.
#[derive(Default)]
pub struct InMemoryResolver {
    cards: Vec<Card>,
    by_id: HashMap<String, usize>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl InMemoryResolver {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards: Vec<Card> = cards.into_iter().collect();
        let by_id = cards
            .iter()
            .enumerate()
            .map(|(n, card)| (card.id.clone(), n))
            .collect();
        InMemoryResolver {
            cards,
            by_id,
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Number of resolver calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|n| &self.cards[*n])
    }

    fn fuzzy(&self, name: &str) -> Option<&Card> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        self.cards
            .iter()
            .find(|card| card.name.to_lowercase() == wanted)
            .or_else(|| {
                self.cards
                    .iter()
                    .filter(|card| card.name.to_lowercase().contains(&wanted))
                    .min_by_key(|card| card.name.len())
            })
    }
}

#[async_trait]
impl CardResolver for InMemoryResolver {
    async fn card(&self, id: &str) -> Result<Option<Card>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(id).cloned())
    }

    async fn cards(&self, ids: &[String]) -> Result<Vec<Card>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if ids.len() > MAX_BATCH {
            return Err(ResolveError::BatchTooLarge {
                requested: ids.len(),
                limit: MAX_BATCH,
            });
        }
        Ok(ids.iter().filter_map(|id| self.lookup(id).cloned()).collect())
    }

    async fn card_named(&self, name: &str) -> Result<Option<Card>, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(name) {
            return Err(ResolveError::Transport(format!("lookup of {:?} failed", name)));
        }

        let exact = self.cards.iter().find(|card| card.name == name);
        Ok(exact.or_else(|| self.fuzzy(name)).cloned())
    }
}
