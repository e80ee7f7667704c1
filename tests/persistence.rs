mod support;

use serde_json::json;

use deckhand::{
    DeckPatch, InMemoryStore, JsonFileStore, KeyValueStore, Library, LibraryConfig, ManualClock,
    Persistence, StorageError, Zone,
};
use support::{bolt, copies, goblin_guide, krenko, start_time, SwitchableStore};

async fn open(store: impl KeyValueStore + 'static) -> Library {
    Library::open(Persistence::attached(store), &LibraryConfig::default())
        .await
        .with_clock(ManualClock::new(start_time()))
}

#[tokio::test]
async fn state_survives_a_reload() {
    let store = InMemoryStore::new();
    let mut library = open(store.clone()).await;

    let _ = library.add_to_collection(copies(&bolt(), 4, false));
    let _ = library.add_to_collection(copies(&bolt(), 1, true));
    let (deck, _) = library.create_deck("Goblins", "commander", Some("go wide".into()));
    let _ = library.add_card_to_deck(&deck.id, krenko().to_deck_entry(1, Zone::Commander));
    let _ = library.add_card_to_deck(&deck.id, goblin_guide().to_deck_entry(1, Zone::Main));
    let _ = library.add_card_to_deck(&deck.id, bolt().to_deck_entry(1, Zone::Main));
    library.flush().await.unwrap();

    let reloaded = open(store).await;
    assert_eq!(reloaded.collection(), library.collection());
    assert_eq!(reloaded.decks(), library.decks());

    let order: Vec<_> = reloaded
        .get_deck(&deck.id)
        .unwrap()
        .cards
        .iter()
        .map(|entry| entry.card_id.as_str())
        .collect();
    assert_eq!(order, vec!["krenko", "goblin-guide", "bolt"]);
}

#[tokio::test]
async fn wall_clock_state_survives_a_reload() {
    let store = InMemoryStore::new();
    let mut library = Library::open(Persistence::attached(store.clone()), &LibraryConfig::default()).await;

    let _ = library.add_to_collection(copies(&bolt(), 3, false));
    let (deck, _) = library.create_deck("Burn", "modern", None);
    let _ = library.add_card_to_deck(&deck.id, bolt().to_deck_entry(4, Zone::Main));
    library.flush().await.unwrap();

    let reloaded = Library::open(Persistence::attached(store), &LibraryConfig::default()).await;
    assert_eq!(reloaded.collection(), library.collection());
    assert_eq!(reloaded.decks(), library.decks());
}

#[tokio::test]
async fn writes_use_the_stored_field_names() {
    let store = InMemoryStore::new();
    let mut library = open(store.clone()).await;

    let _ = library.add_to_collection(copies(&bolt(), 2, true));
    let (deck, _) = library.create_deck("Burn", "modern", None);
    library
        .add_card_to_deck(&deck.id, bolt().to_deck_entry(4, Zone::Main))
        .wait()
        .await
        .unwrap();

    let collection = store.get("collection").await.unwrap().unwrap();
    assert_eq!(
        collection,
        json!([{
            "scryfallId": "bolt",
            "name": "Lightning Bolt",
            "set": "tst",
            "setName": "Test Set",
            "quantity": 2,
            "foil": true,
            "condition": "NM",
            "imageUri": "https://img.example/bolt.jpg",
            "manaCost": "{R}",
            "typeLine": "Instant",
            "colors": ["R"],
            "addedAt": "2024-05-01T12:00:00.000Z"
        }])
    );

    let decks = store.get("decks").await.unwrap().unwrap();
    assert_eq!(
        decks,
        json!([{
            "id": deck.id,
            "name": "Burn",
            "format": "modern",
            "createdAt": "2024-05-01T12:00:00.000Z",
            "updatedAt": "2024-05-01T12:00:00.000Z",
            "cards": [{
                "scryfallId": "bolt",
                "name": "Lightning Bolt",
                "quantity": 4,
                "board": "main",
                "imageUri": "https://img.example/bolt.jpg",
                "manaCost": "{R}",
                "typeLine": "Instant",
                "colors": ["R"]
            }]
        }])
    );
}

#[tokio::test]
async fn reads_data_written_by_earlier_versions() {
    let store = InMemoryStore::new();
    store
        .set(
            "decks",
            json!([{
                "id": "4f0c",
                "name": "Old Deck",
                "format": "legacy",
                "createdAt": "2023-01-02T03:04:05.678Z",
                "updatedAt": "2023-01-02T03:04:05.678Z",
                "cards": [{ "scryfallId": "x", "name": "Brainstorm", "quantity": 4, "board": "main" }]
            }]),
        )
        .await
        .unwrap();
    store.set("collection", json!("not a list")).await.unwrap();

    let library = open(store).await;

    let deck = library.get_deck("4f0c").unwrap();
    assert_eq!(deck.cards[0].name, "Brainstorm");
    assert_eq!(deck.cards[0].type_line, None);
    assert!(library.collection().is_empty());
}

#[tokio::test]
async fn failed_write_surfaces_without_rollback() {
    support::init_tracing();
    let store = SwitchableStore::new();
    let mut library = open(store.clone()).await;
    library.add_to_collection(copies(&bolt(), 1, false)).wait().await.unwrap();

    store.fail_writes(true);
    let err = library
        .add_to_collection(copies(&goblin_guide(), 1, false))
        .wait()
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(library.is_in_collection("goblin-guide"));

    // The next successful write carries the whole list, including the card
    // whose write failed.
    store.fail_writes(false);
    let (deck, _) = library.create_deck("After", "modern", None);
    library.update_deck(&deck.id, DeckPatch::name("Later")).wait().await.unwrap();
    library.update_card_quantity("bolt", 2).wait().await.unwrap();

    let reloaded = open(store.inner().clone()).await;
    assert!(reloaded.is_in_collection("goblin-guide"));
    assert_eq!(reloaded.get_collection_card("bolt").unwrap().quantity, 2);
    assert_eq!(reloaded.get_deck(&deck.id).unwrap().name, "Later");
}

#[tokio::test]
async fn detached_library_works_in_memory() {
    let mut library = Library::in_memory().await;
    library.add_to_collection(copies(&bolt(), 1, false)).wait().await.unwrap();
    library.flush().await.unwrap();
    assert!(library.is_in_collection("bolt"));

    let fresh = Library::in_memory().await;
    assert!(fresh.collection().is_empty());
}

#[tokio::test]
async fn reset_clears_the_store() {
    let store = InMemoryStore::new();
    let mut library = open(store.clone()).await;
    let _ = library.add_to_collection(copies(&bolt(), 1, false));
    library.flush().await.unwrap();
    assert!(!store.is_empty());

    library.reset().wait().await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn file_store_round_trip_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = LibraryConfig {
        data_path: Some(dir.path().join("nested").join("library.json")),
        decks_key: "my-decks".into(),
        ..LibraryConfig::default()
    };

    let persistence = Persistence::from_config(&config).await.unwrap();
    assert!(persistence.is_attached());
    let mut library = Library::open(persistence, &config).await;
    let (deck, _) = library.create_deck("On Disk", "pauper", None);
    let _ = library.add_card_to_deck(&deck.id, bolt().to_deck_entry(4, Zone::Main));
    library.flush().await.unwrap();

    let raw = std::fs::read_to_string(config.data_path.as_ref().unwrap()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["my-decks"][0]["name"], "On Disk");

    let store = JsonFileStore::open(config.data_path.as_ref().unwrap()).await.unwrap();
    let reloaded = Library::open(Persistence::attached(store), &config).await;
    assert_eq!(reloaded.get_deck(&deck.id).unwrap().cards[0].quantity, 4);
}
