//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use deckhand::{
    Card, Condition, InMemoryResolver, InMemoryStore, KeyValueStore, NewCollectionEntry, Prices,
    StorageError,
};

/// Route `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn card(id: &str, name: &str, type_line: &str, cost: Option<&str>, colors: &[&str], usd: Option<&str>) -> Card {
    Card {
        id: id.into(),
        name: name.into(),
        set: "tst".into(),
        set_name: "Test Set".into(),
        mana_cost: cost.map(Into::into),
        type_line: type_line.into(),
        colors: Some(colors.iter().map(|c| c.to_string()).collect()),
        color_identity: colors.iter().map(|c| c.to_string()).collect(),
        image_uri: Some(format!("https://img.example/{}.jpg", id)),
        prices: Prices {
            usd: usd.map(Into::into),
            ..Prices::default()
        },
    }
}

pub fn bolt() -> Card {
    card("bolt", "Lightning Bolt", "Instant", Some("{R}"), &["R"], Some("1.50"))
}

pub fn goblin_guide() -> Card {
    card("goblin-guide", "Goblin Guide", "Creature - Goblin Scout", Some("{R}"), &["R"], Some("3.00"))
}

pub fn mountain() -> Card {
    card("mountain", "Mountain", "Basic Land - Mountain", None, &[], Some("0.10"))
}

pub fn krenko() -> Card {
    card("krenko", "Krenko, Mob Boss", "Legendary Creature - Goblin Warrior", Some("{2}{R}{R}"), &["R"], None)
}

pub fn sol_ring() -> Card {
    card("sol-ring", "Sol Ring", "Artifact", Some("{1}"), &[], Some("2.00"))
}

pub fn catalog() -> Vec<Card> {
    vec![bolt(), goblin_guide(), mountain(), krenko(), sol_ring()]
}

pub fn resolver() -> InMemoryResolver {
    InMemoryResolver::new(catalog())
}

pub fn copies(card: &Card, quantity: u32, foil: bool) -> NewCollectionEntry {
    card.to_collection_entry(quantity, foil, Condition::NearMint)
}

/// Store that can be switched to reject writes while still serving reads.
#[derive(Clone, Default)]
pub struct SwitchableStore {
    inner: InMemoryStore,
    failing: Arc<AtomicBool>,
}

impl SwitchableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("disk full".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for SwitchableStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check()?;
        self.inner.clear().await
    }
}
