// Deck analysis: statistics, land recommendation and format legality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::card::{ArenaId, CardMetadata};
use crate::error::ParseError;

pub mod legality;
pub mod stats;

pub use legality::{check_legality, DeckFormat, Format, LegalityResult};
pub use stats::{
    analyze_deck, land_status, recommend_lands, ColorStats, CreatureStats, DeckStatistics,
    LandStats, LandStatus, TypeStats,
};

// ---------------------------------------------------------------------------
// Deck entries
// ---------------------------------------------------------------------------

/// Which part of the deck a card sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    Main,
    Sideboard,
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "main" | "mainboard" | "deck" => Ok(Board::Main),
            "side" | "sideboard" => Ok(Board::Sideboard),
            _ => Err(ParseError::UnknownBoard(s.to_string())),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::Main => f.write_str("main"),
            Board::Sideboard => f.write_str("sideboard"),
        }
    }
}

/// One line of a deck. Callers keep at most one entry per (card, board).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub card_id: ArenaId,
    pub quantity: u32,
    pub board: Board,
}

impl DeckCard {
    pub fn main(card_id: ArenaId, quantity: u32) -> Self {
        DeckCard {
            card_id,
            quantity,
            board: Board::Main,
        }
    }

    pub fn sideboard(card_id: ArenaId, quantity: u32) -> Self {
        DeckCard {
            card_id,
            quantity,
            board: Board::Sideboard,
        }
    }
}

// ---------------------------------------------------------------------------
// Format rules
// ---------------------------------------------------------------------------

/// Deck-construction constants: which cards are basic lands and the size
/// and copy limits of each format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatRules {
    /// Canonical basic land names, matched case-sensitively.
    pub basic_land_names: Vec<String>,
    /// Arena ids of basic lands, recognised even without card metadata.
    pub basic_land_ids: Vec<ArenaId>,
    pub constructed_min_size: u32,
    pub max_copies: u32,
    pub brawl_size: u32,
    pub commander_size: u32,
}

impl Default for FormatRules {
    fn default() -> Self {
        FormatRules {
            basic_land_names: ["Plains", "Island", "Swamp", "Mountain", "Forest", "Wastes"]
                .into_iter()
                .map(String::from)
                .collect(),
            basic_land_ids: vec![81716, 81717, 81718, 81719, 81720],
            constructed_min_size: 60,
            max_copies: 4,
            brawl_size: 60,
            commander_size: 99,
        }
    }
}

impl FormatRules {
    pub fn is_basic_land_name(&self, name: &str) -> bool {
        self.basic_land_names.iter().any(|n| n == name)
    }

    pub fn is_basic_land_id(&self, card_id: ArenaId) -> bool {
        self.basic_land_ids.contains(&card_id)
    }

    /// A card is basic when its id is a known basic, it is printed as one,
    /// or it carries a basic land name.
    pub fn is_basic_land(&self, card: &CardMetadata) -> bool {
        self.is_basic_land_id(card.arena_id)
            || card.is_printed_basic_land()
            || self.is_basic_land_name(&card.name)
    }
}
