use std::cmp::Ordering;
use std::fmt;

use crate::model::{Deck, DeckEntry};

use super::PriceBook;

const SINGLE_SYMBOLS: &[u8] = b"WUBRGCS";

/// Mana value of a printed cost such as `{2}{W}{W}`.
///
/// Every run of digits adds its number and every single-letter `{W}`, `{U}`,
/// `{B}`, `{R}`, `{G}`, `{C}` or `{S}` symbol adds one. Hybrid and `{X}`
/// symbols only contribute their digits. A missing cost is zero.
pub fn mana_value(cost: Option<&str>) -> u32 {
    let Some(cost) = cost else {
        return 0;
    };
    let bytes = cost.as_bytes();
    let mut total = 0u32;
    let mut run: Option<u32> = None;

    for (i, &byte) in bytes.iter().enumerate() {
        if byte.is_ascii_digit() {
            let digit = u32::from(byte - b'0');
            run = Some(run.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            continue;
        }
        if let Some(number) = run.take() {
            total = total.saturating_add(number);
        }
        if byte == b'{'
            && bytes.get(i + 2) == Some(&b'}')
            && bytes
                .get(i + 1)
                .is_some_and(|symbol| SINGLE_SYMBOLS.contains(&symbol.to_ascii_uppercase()))
        {
            total = total.saturating_add(1);
        }
    }

    total.saturating_add(run.unwrap_or(0))
}

/// Card type buckets used to lay out a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeGroup {
    Creature,
    Planeswalker,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Other,
    Land,
}

impl TypeGroup {
    /// Groups in layout order; lands come last.
    pub const DISPLAY_ORDER: [TypeGroup; 8] = [
        TypeGroup::Creature,
        TypeGroup::Planeswalker,
        TypeGroup::Instant,
        TypeGroup::Sorcery,
        TypeGroup::Artifact,
        TypeGroup::Enchantment,
        TypeGroup::Other,
        TypeGroup::Land,
    ];

    /// Classify a type line. Checked in the order land, creature,
    /// planeswalker, instant, sorcery, artifact, enchantment, so an
    /// "Artifact Creature" is a creature and an "Artifact Land" a land.
    pub fn of(type_line: Option<&str>) -> TypeGroup {
        let Some(line) = type_line else {
            return TypeGroup::Other;
        };
        let line = line.to_lowercase();
        [
            ("land", TypeGroup::Land),
            ("creature", TypeGroup::Creature),
            ("planeswalker", TypeGroup::Planeswalker),
            ("instant", TypeGroup::Instant),
            ("sorcery", TypeGroup::Sorcery),
            ("artifact", TypeGroup::Artifact),
            ("enchantment", TypeGroup::Enchantment),
        ]
        .into_iter()
        .find(|(word, _)| line.contains(word))
        .map(|(_, group)| group)
        .unwrap_or(TypeGroup::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            TypeGroup::Creature => "Creatures",
            TypeGroup::Planeswalker => "Planeswalkers",
            TypeGroup::Instant => "Instants",
            TypeGroup::Sorcery => "Sorceries",
            TypeGroup::Artifact => "Artifacts",
            TypeGroup::Enchantment => "Enchantments",
            TypeGroup::Other => "Other",
            TypeGroup::Land => "Lands",
        }
    }
}

impl fmt::Display for TypeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket entries by type in display order. Empty groups are left out and
/// entries keep their relative order inside a group.
pub fn group_by_type<'a, I>(entries: I) -> Vec<(TypeGroup, Vec<&'a DeckEntry>)>
where
    I: IntoIterator<Item = &'a DeckEntry>,
{
    let mut groups: Vec<(TypeGroup, Vec<&'a DeckEntry>)> = TypeGroup::DISPLAY_ORDER
        .iter()
        .map(|group| (*group, Vec::new()))
        .collect();

    for entry in entries {
        let group = TypeGroup::of(entry.type_line.as_deref());
        if let Some((_, members)) = groups.iter_mut().find(|(g, _)| *g == group) {
            members.push(entry);
        }
    }

    groups.retain(|(_, members)| !members.is_empty());
    groups
}

/// Orderings for the entries of a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Name,
    ManaValue,
    /// Most expensive first; unpriced cards sort as zero.
    Price,
}

pub fn sort_entries(entries: &mut [&DeckEntry], mode: SortMode, prices: &PriceBook) {
    match mode {
        SortMode::Name => entries.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::ManaValue => entries.sort_by_key(|entry| mana_value(entry.mana_cost.as_deref())),
        SortMode::Price => entries.sort_by(|a, b| {
            let pa = prices.unit_price(&a.card_id, false);
            let pb = prices.unit_price(&b.card_id, false);
            pb.total_cmp(&pa)
        }),
    }
}

/// Orderings for the deck list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeckSort {
    /// Most recently changed first.
    #[default]
    Updated,
    Name,
    /// Largest deck first.
    Count,
}

pub fn sort_decks(decks: &mut [&Deck], mode: DeckSort) {
    match mode {
        DeckSort::Updated => decks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        DeckSort::Name => decks.sort_by(|a, b| compare_names(&a.name, &b.name)),
        DeckSort::Count => decks.sort_by_key(|deck| std::cmp::Reverse(deck.total_cards())),
    }
}

pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
