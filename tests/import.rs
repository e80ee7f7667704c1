mod support;

use serde_json::json;

use deckhand::workflow::{
    add_precon_to_collection, add_to_deck_and_collection, import_deck_list, import_precon_as_deck,
    MissReason, PreconDeck,
};
use deckhand::{Condition, Library, WorkflowError, Zone};
use support::{bolt, copies, krenko, resolver};

#[tokio::test]
async fn zero_copy_lines_are_reported_not_counted() {
    let mut library = Library::in_memory().await;
    let resolver = resolver();
    let text = "\
Commander
1 Krenko, Mob Boss

Deck
0 Mountain
4 Lightning Bolt
";

    let report = import_deck_list(&mut library, &resolver, "Krenko", "commander", text)
        .await
        .unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].name, "Mountain");
    assert_eq!(report.unresolved[0].reason, MissReason::ZeroQuantity);
    assert_eq!(resolver.calls(), 2);

    let deck = library.get_deck(report.deck_id.as_deref().unwrap()).unwrap();
    assert!(!deck.contains_card("mountain"));
}

#[tokio::test]
async fn unresolved_names_are_reported_and_skipped() {
    support::init_tracing();
    let mut library = Library::in_memory().await;
    let resolver = resolver().failing_on("Goblin Guide");
    let text = "\
Commander
1 Krenko, Mob Boss

Deck
4 Lightning Bolt
4 Goblin Guide
2 Made Up Card
20 Mountain
";

    let report = import_deck_list(&mut library, &resolver, "Krenko", "commander", text)
        .await
        .unwrap();

    assert_eq!(report.added, 3);
    assert_eq!(report.unresolved.len(), 2);
    assert_eq!(report.unresolved[0].name, "Goblin Guide");
    assert!(matches!(report.unresolved[0].reason, MissReason::Lookup(_)));
    assert_eq!(report.unresolved[1].name, "Made Up Card");
    assert_eq!(report.unresolved[1].reason, MissReason::NotFound);

    let deck = library.get_deck(report.deck_id.as_deref().unwrap()).unwrap();
    assert_eq!(deck.name, "Krenko");
    assert_eq!(deck.entry("krenko", Zone::Commander).unwrap().quantity, 1);
    assert_eq!(deck.entry("bolt", Zone::Main).unwrap().quantity, 4);
    assert_eq!(deck.entry("mountain", Zone::Main).unwrap().quantity, 20);
    assert!(!deck.contains_card("goblin-guide"));
    assert_eq!(resolver.calls(), 5);
}

#[tokio::test]
async fn first_card_leads_when_no_commander_section() {
    let mut library = Library::in_memory().await;
    let resolver = resolver();

    let report = import_deck_list(
        &mut library,
        &resolver,
        "  Goblins  ",
        "commander",
        "1 krenko, mob boss\n30 Mountain",
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    let deck = library.get_deck(report.deck_id.as_deref().unwrap()).unwrap();
    assert_eq!(deck.name, "Goblins");
    assert_eq!(deck.zone_count(Zone::Commander), 1);
    assert_eq!(deck.entry("krenko", Zone::Commander).unwrap().name, "Krenko, Mob Boss");
    assert_eq!(deck.zone_count(Zone::Main), 30);
}

#[tokio::test]
async fn empty_input_is_rejected_before_anything_changes() {
    let mut library = Library::in_memory().await;
    let resolver = resolver();

    let err = import_deck_list(&mut library, &resolver, " ", "modern", "4 Lightning Bolt")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput(_)));

    let err = import_deck_list(&mut library, &resolver, "Empty", "modern", "// nothing\n\n")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidInput(_)));

    assert!(library.decks().is_empty());
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn adding_to_a_deck_also_collects_new_cards() {
    let mut library = Library::in_memory().await;
    let (deck, _) = library.create_deck("Burn", "modern", None);

    add_to_deck_and_collection(&mut library, &deck.id, &bolt(), 4, Zone::Main)
        .await
        .unwrap();
    let owned = library.get_collection_card("bolt").unwrap();
    assert_eq!(owned.quantity, 4);
    assert!(!owned.foil);
    assert_eq!(owned.condition, Condition::NearMint);

    // Already owned: the collection is left alone.
    add_to_deck_and_collection(&mut library, &deck.id, &bolt(), 2, Zone::Sideboard)
        .await
        .unwrap();
    assert_eq!(library.get_collection_card("bolt").unwrap().quantity, 4);
    assert_eq!(library.get_deck(&deck.id).unwrap().total_cards(), 6);
}

#[tokio::test]
async fn adding_to_a_missing_deck_fails_cleanly() {
    let mut library = Library::in_memory().await;
    let err = add_to_deck_and_collection(&mut library, "nope", &bolt(), 1, Zone::Main)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::UnknownDeck(_)));
    assert!(library.collection().is_empty());
}

fn precon() -> PreconDeck {
    serde_json::from_value(json!({
        "code": "TST",
        "name": "Goblin Horde",
        "commander": [
            { "count": 1, "name": "Krenko, Mob Boss", "identifiers": { "scryfallId": "krenko" } }
        ],
        "mainBoard": [
            { "count": 1, "name": "Sol Ring", "identifiers": { "scryfallId": "sol-ring" } },
            { "count": 1, "name": "Goblin Guide", "identifiers": { "scryfallId": "goblin-guide" } },
            { "count": 20, "name": "Mountain", "identifiers": { "scryfallId": "mountain" } },
            { "count": 1, "name": "Unreleased Card", "identifiers": { "scryfallId": "unknown-id" } },
            { "count": 1, "name": "No Identifier", "identifiers": {} }
        ],
        "sideBoard": [
            { "count": 1, "name": "Lightning Bolt", "identifiers": { "scryfallId": "bolt" } }
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn precon_cards_go_into_the_collection() {
    let mut library = Library::in_memory().await;
    let resolver = resolver();

    let report = add_precon_to_collection(&mut library, &resolver, &precon(), 2)
        .await
        .unwrap();

    assert_eq!(report.added, 4);
    assert_eq!(report.deck_id, None);
    let mut missing: Vec<_> = report.unresolved.iter().map(|m| m.name.as_str()).collect();
    missing.sort();
    assert_eq!(missing, vec!["No Identifier", "Unreleased Card"]);

    assert_eq!(library.get_collection_card("mountain").unwrap().quantity, 20);
    assert_eq!(library.get_collection_card("krenko").unwrap().quantity, 1);
    assert!(!library.is_in_collection("bolt"));
    // Five ids in batches of two.
    assert_eq!(resolver.calls(), 3);
}

#[tokio::test]
async fn precon_becomes_a_commander_deck() {
    let mut library = Library::in_memory().await;
    let _ = library.add_to_collection(copies(&krenko(), 1, true));
    let resolver = resolver();

    let report = import_precon_as_deck(&mut library, &resolver, &precon(), 75)
        .await
        .unwrap();

    let deck = library.get_deck(report.deck_id.as_deref().unwrap()).unwrap();
    assert_eq!(deck.name, "Goblin Horde");
    assert_eq!(deck.format, "commander");
    assert_eq!(deck.description.as_deref(), Some("Precon: Goblin Horde"));
    assert_eq!(deck.entry("krenko", Zone::Commander).unwrap().quantity, 1);
    assert_eq!(deck.entry("mountain", Zone::Main).unwrap().quantity, 20);
    assert!(!deck.contains_card("bolt"));
    assert_eq!(report.added, 4);

    // The foil Krenko already counted as owned; nothing was added for it.
    assert_eq!(library.collection().owned_copies("krenko"), 1);
    assert!(library.collection().get_variant("krenko", false).is_none());
    assert_eq!(library.get_collection_card("sol-ring").unwrap().quantity, 1);
}
