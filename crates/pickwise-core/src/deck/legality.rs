// Format legality checks for Arena constructed formats.
//
// Rules are additive: every violated rule adds a reason to each format it
// applies to, and a format with any reason is illegal. Basic lands are
// exempt from copy limits everywhere.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::ArenaId;
use crate::deck::{Board, DeckCard, FormatRules};
use crate::error::ParseError;
use crate::lookup::CardMetadataLookup;

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Formats a deck is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Standard,
    Historic,
    Explorer,
    Alchemy,
    Brawl,
    Commander,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Standard,
        Format::Historic,
        Format::Explorer,
        Format::Alchemy,
        Format::Brawl,
        Format::Commander,
    ];

    /// Sixty-card formats with the four-copy rule.
    pub const CONSTRUCTED: [Format; 4] = [
        Format::Standard,
        Format::Historic,
        Format::Explorer,
        Format::Alchemy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Format::Standard => "Standard",
            Format::Historic => "Historic",
            Format::Explorer => "Explorer",
            Format::Alchemy => "Alchemy",
            Format::Brawl => "Brawl",
            Format::Commander => "Commander",
        }
    }
}

/// The format a deck was built for. Decides which size rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckFormat {
    Constructed(Format),
    Limited,
}

impl DeckFormat {
    pub fn label(&self) -> &'static str {
        match self {
            DeckFormat::Constructed(format) => format.label(),
            DeckFormat::Limited => "Limited",
        }
    }

    /// Brawl and Limited decks are not held to the constructed minimum.
    fn exempt_from_constructed_minimum(&self) -> bool {
        matches!(self, DeckFormat::Constructed(Format::Brawl) | DeckFormat::Limited)
    }
}

impl FromStr for DeckFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "limited" || lower == "draft" || lower == "sealed" {
            return Ok(DeckFormat::Limited);
        }
        Format::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(&lower))
            .map(DeckFormat::Constructed)
            .ok_or_else(|| ParseError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for DeckFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityResult {
    pub legal: bool,
    pub reasons: Vec<String>,
}

impl Default for LegalityResult {
    fn default() -> Self {
        LegalityResult {
            legal: true,
            reasons: Vec::new(),
        }
    }
}

impl LegalityResult {
    /// Record a violation. Legality never comes back once lost.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.legal = false;
        self.reasons.push(reason.into());
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Check the mainboard of `cards` against every format.
///
/// - Decks below the constructed minimum are illegal in the four constructed
///   formats, unless built for Brawl or Limited.
/// - A card above the copy limit is illegal in the four constructed formats.
/// - Brawl and Commander need their exact deck size and are singleton.
///
/// Basic lands (by id or by name) are exempt from copy limits. Cards with no
/// metadata still count toward deck size but cannot be named in a copy-limit
/// reason, so they are skipped for those checks.
pub fn check_legality<C: CardMetadataLookup + ?Sized>(
    cards: &[DeckCard],
    deck_format: DeckFormat,
    catalog: &C,
    rules: &FormatRules,
) -> BTreeMap<Format, LegalityResult> {
    let mut results: BTreeMap<Format, LegalityResult> = Format::ALL
        .into_iter()
        .map(|f| (f, LegalityResult::default()))
        .collect();
    let mut fail = |formats: &[Format], reason: &str| {
        for format in formats {
            if let Some(result) = results.get_mut(format) {
                result.fail(reason);
            }
        }
    };

    // Per-card totals in first-seen order so reasons come out deterministic.
    let mut order: Vec<ArenaId> = Vec::new();
    let mut counts: HashMap<ArenaId, u32> = HashMap::new();
    let mut total = 0u32;
    for entry in cards.iter().filter(|c| c.board == Board::Main) {
        total = total.saturating_add(entry.quantity);
        let count = counts.entry(entry.card_id).or_insert_with(|| {
            order.push(entry.card_id);
            0
        });
        *count = count.saturating_add(entry.quantity);
    }

    if total < rules.constructed_min_size && !deck_format.exempt_from_constructed_minimum() {
        fail(
            &Format::CONSTRUCTED,
            &format!(
                "Deck has only {total} cards (minimum {} for constructed)",
                rules.constructed_min_size
            ),
        );
    }

    let named_non_basics: Vec<(String, u32)> = order
        .iter()
        .filter(|id| !rules.is_basic_land_id(**id))
        .filter_map(|id| {
            let count = counts.get(id).copied().unwrap_or(0);
            if count <= 1 {
                return None;
            }
            match catalog.get_card(*id) {
                Some(card) if rules.is_basic_land_name(&card.name) => None,
                Some(card) => Some((card.name, count)),
                None => {
                    debug!("no metadata for card {id}, skipping copy-limit checks");
                    None
                }
            }
        })
        .collect();

    for (name, count) in &named_non_basics {
        if *count > rules.max_copies {
            fail(
                &Format::CONSTRUCTED,
                &format!(
                    "Card '{name}' has {count} copies (maximum {})",
                    rules.max_copies
                ),
            );
        }
    }

    if total != rules.brawl_size {
        fail(
            &[Format::Brawl],
            &format!(
                "Brawl decks must have exactly {} cards (currently {total})",
                rules.brawl_size
            ),
        );
    }
    if total != rules.commander_size {
        fail(
            &[Format::Commander],
            &format!(
                "Commander decks must have exactly {} cards plus commander (currently {total})",
                rules.commander_size
            ),
        );
    }
    for (name, count) in &named_non_basics {
        fail(
            &[Format::Brawl, Format::Commander],
            &format!("Card '{name}' has {count} copies (singleton format allows only 1)"),
        );
    }

    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
