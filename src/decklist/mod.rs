//! Plain-text deck lists, the format most deck sites import and export.
//!
//! ```text
//! Commander
//! 1 Atraxa, Praetors' Voice
//!
//! Deck
//! 1 Sol Ring
//! 10x Forest
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Deck, Zone};

static CARD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)x?\s+(.+)$").expect("invalid card line pattern"));

/// One card line of a deck list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub quantity: u32,
    pub name: String,
    pub zone: Zone,
}

/// Parse deck list text.
///
/// Lines are trimmed; blank lines and lines starting with `//` or `#` are
/// skipped. A line reading `commander`, `deck`/`main` or `sideboard`/`side`
/// (any case) switches the zone for the lines after it, starting in main.
/// Card lines look like `4 Name` or `4x Name`; anything else is one copy of
/// the whole line. Counts beyond `u32::MAX` are clamped.
pub fn parse(text: &str) -> Vec<ParsedLine> {
    let mut zone = Zone::Main;
    let mut lines = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }
        if let Some(header) = section(line) {
            zone = header;
            continue;
        }

        let (quantity, name) = split_quantity(line).unwrap_or((1, line));
        lines.push(ParsedLine {
            quantity,
            name: name.to_string(),
            zone,
        });
    }

    lines
}

fn section(line: &str) -> Option<Zone> {
    match line.to_lowercase().as_str() {
        "commander" => Some(Zone::Commander),
        "deck" | "main" => Some(Zone::Main),
        "sideboard" | "side" => Some(Zone::Sideboard),
        _ => None,
    }
}

fn split_quantity(line: &str) -> Option<(u32, &str)> {
    let captures = CARD_LINE.captures(line)?;
    let quantity = captures[1].parse().unwrap_or(u32::MAX);
    let name = captures.get(2)?.as_str().trim_end();
    Some((quantity, name))
}

/// Render a deck as text: `Commander`, `Deck` and `Sideboard` sections with
/// `N Name` lines, empty sections left out.
pub fn export(deck: &Deck) -> String {
    let sections = [
        (Zone::Commander, "Commander"),
        (Zone::Main, "Deck"),
        (Zone::Sideboard, "Sideboard"),
    ];

    let mut blocks = Vec::new();
    for (zone, title) in sections {
        let mut block = String::new();
        for entry in deck.zone_entries(zone) {
            if block.is_empty() {
                block.push_str(title);
            }
            block.push('\n');
            block.push_str(&format!("{} {}", entry.quantity, entry.name));
        }
        if !block.is_empty() {
            blocks.push(block);
        }
    }

    blocks.join("\n\n")
}
