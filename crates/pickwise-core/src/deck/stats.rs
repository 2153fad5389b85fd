// Deck statistics and land-count recommendation.
//
// One pass over the mainboard accumulates the mana curve, color and type
// breakdowns, land split and creature stats. Basic lands are recognised by
// id first so they are counted even when no metadata is available.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::card::{parse_power_toughness, CardType, Color};
use crate::deck::{Board, DeckCard, FormatRules};
use crate::lookup::CardMetadataLookup;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorStats {
    pub white: u32,
    pub blue: u32,
    pub black: u32,
    pub red: u32,
    pub green: u32,
    pub colorless: u32,
    pub multicolor: u32,
}

impl ColorStats {
    fn add_single(&mut self, color: Color, quantity: u32) {
        let slot = match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
        };
        *slot = slot.saturating_add(quantity);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    pub creatures: u32,
    pub instants: u32,
    pub sorceries: u32,
    pub enchantments: u32,
    pub artifacts: u32,
    pub planeswalkers: u32,
    pub lands: u32,
    pub other: u32,
}

impl TypeStats {
    fn add(&mut self, card_type: CardType, quantity: u32) {
        let slot = match card_type {
            CardType::Land => &mut self.lands,
            CardType::Creature => &mut self.creatures,
            CardType::Planeswalker => &mut self.planeswalkers,
            CardType::Instant => &mut self.instants,
            CardType::Sorcery => &mut self.sorceries,
            CardType::Enchantment => &mut self.enchantments,
            CardType::Artifact => &mut self.artifacts,
            CardType::Other => &mut self.other,
        };
        *slot = slot.saturating_add(quantity);
    }
}

/// How the actual land count compares to the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandStatus {
    Optimal,
    TooFew,
    TooMany,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandStats {
    pub total: u32,
    pub basic: u32,
    pub non_basic: u32,
    /// Lands as a percentage of counted mainboard cards.
    pub ratio: f64,
    pub recommended: u32,
    pub status: LandStatus,
    pub status_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatureStats {
    pub total: u32,
    pub total_power: i64,
    pub total_toughness: i64,
    pub average_power: f64,
    pub average_toughness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckStatistics {
    /// Mainboard cards that could be analyzed (known metadata or basic id).
    pub total_mainboard: u32,
    pub total_sideboard: u32,
    pub total_cards: u32,
    pub mana_curve: BTreeMap<u32, u32>,
    pub max_cmc: u32,
    /// Average mana value over non-land cards.
    pub average_cmc: f64,
    pub colors: ColorStats,
    pub types: TypeStats,
    pub lands: LandStats,
    pub creatures: CreatureStats,
}

// ---------------------------------------------------------------------------
// Land recommendation
// ---------------------------------------------------------------------------

/// Average mana value the base land counts are tuned for.
const BASELINE_CMC: f64 = 2.5;

/// Recommended land count for a deck size and non-land average CMC.
///
/// | deck size | base | per CMC | range   |
/// |-----------|------|---------|---------|
/// | >= 99     | 37   | 2.0     | 33..=42 |
/// | >= 60     | 24   | 2.0     | 20..=28 |
/// | otherwise | 17   | 1.5     | 15..=19 |
///
/// The CMC adjustment is truncated toward zero before it is added.
pub fn recommend_lands(deck_size: u32, average_cmc: f64) -> u32 {
    let (base, slope, min, max) = match deck_size {
        99.. => (37, 2.0, 33, 42),
        60..=98 => (24, 2.0, 20, 28),
        _ => (17, 1.5, 15, 19),
    };
    let adjustment = ((average_cmc - BASELINE_CMC) * slope).trunc();
    let adjustment = if adjustment.is_finite() { adjustment as i64 } else { 0 };
    (base + adjustment).clamp(min, max) as u32
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Compare the actual land count with the recommendation. Within one land
/// either way is optimal.
pub fn land_status(actual: u32, recommended: u32) -> (LandStatus, String) {
    let difference = i64::from(actual) - i64::from(recommended);
    match difference {
        -1..=1 => (
            LandStatus::Optimal,
            "Land count is optimal for your deck".to_string(),
        ),
        d if d < -1 => {
            let missing = (-d) as u32;
            (
                LandStatus::TooFew,
                format!(
                    "Consider adding {missing} more land{} (currently {actual}, recommended {recommended})",
                    plural(missing)
                ),
            )
        }
        d => {
            let extra = d as u32;
            (
                LandStatus::TooMany,
                format!(
                    "Consider removing {extra} land{} (currently {actual}, recommended {recommended})",
                    plural(extra)
                ),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Compute statistics for a deck.
///
/// Only mainboard cards feed the curve, color, type, land and creature
/// numbers; sideboard quantities are totalled. Mainboard cards with neither
/// metadata nor a basic-land id are skipped with a warning.
pub fn analyze_deck<C: CardMetadataLookup + ?Sized>(
    cards: &[DeckCard],
    catalog: &C,
    rules: &FormatRules,
) -> DeckStatistics {
    let mut total_mainboard = 0u32;
    let mut total_sideboard = 0u32;
    let mut mana_curve: BTreeMap<u32, u32> = BTreeMap::new();
    let mut max_cmc = 0u32;
    let mut colors = ColorStats::default();
    let mut types = TypeStats::default();
    let (mut land_total, mut land_basic, mut land_non_basic) = (0u32, 0u32, 0u32);
    let mut total_cmc = 0.0;
    let mut non_land_count = 0u32;
    let (mut total_power, mut total_toughness, mut creatures_with_stats) = (0i64, 0i64, 0u32);

    for entry in cards {
        let quantity = entry.quantity;
        if entry.board == Board::Sideboard {
            total_sideboard = total_sideboard.saturating_add(quantity);
            continue;
        }

        if rules.is_basic_land_id(entry.card_id) {
            total_mainboard = total_mainboard.saturating_add(quantity);
            land_total = land_total.saturating_add(quantity);
            land_basic = land_basic.saturating_add(quantity);
            types.lands = types.lands.saturating_add(quantity);
            let slot = mana_curve.entry(0).or_default();
            *slot = slot.saturating_add(quantity);
            continue;
        }

        let Some(card) = catalog.get_card(entry.card_id) else {
            warn!("no metadata for card {}, leaving it out of deck statistics", entry.card_id);
            continue;
        };

        total_mainboard = total_mainboard.saturating_add(quantity);

        let cmc = if card.cmc.is_finite() && card.cmc > 0.0 {
            card.cmc as u32
        } else {
            0
        };
        let slot = mana_curve.entry(cmc).or_default();
        *slot = slot.saturating_add(quantity);
        max_cmc = max_cmc.max(cmc);

        match card.colors.len() {
            0 => colors.colorless = colors.colorless.saturating_add(quantity),
            1 => {
                if let Some(color) = card.colors.single() {
                    colors.add_single(color, quantity);
                }
            }
            _ => colors.multicolor = colors.multicolor.saturating_add(quantity),
        }

        types.add(card.card_type, quantity);
        if card.is_land() {
            land_total = land_total.saturating_add(quantity);
            if rules.is_basic_land_name(&card.name) {
                land_basic = land_basic.saturating_add(quantity);
            } else {
                land_non_basic = land_non_basic.saturating_add(quantity);
            }
        } else {
            total_cmc += card.cmc * f64::from(quantity);
            non_land_count = non_land_count.saturating_add(quantity);
        }

        if card.is_creature {
            if let (Some(power), Some(toughness)) = (&card.power, &card.toughness) {
                total_power = total_power
                    .saturating_add(parse_power_toughness(power).saturating_mul(i64::from(quantity)));
                total_toughness = total_toughness
                    .saturating_add(parse_power_toughness(toughness).saturating_mul(i64::from(quantity)));
                creatures_with_stats = creatures_with_stats.saturating_add(quantity);
            }
        }
    }

    let average_cmc = if non_land_count > 0 {
        total_cmc / f64::from(non_land_count)
    } else {
        0.0
    };
    let ratio = if total_mainboard > 0 {
        f64::from(land_total) / f64::from(total_mainboard) * 100.0
    } else {
        0.0
    };

    let recommended = recommend_lands(total_mainboard, average_cmc);
    let (status, status_message) = land_status(land_total, recommended);

    let creatures = CreatureStats {
        total: types.creatures,
        total_power,
        total_toughness,
        average_power: if creatures_with_stats > 0 {
            total_power as f64 / f64::from(creatures_with_stats)
        } else {
            0.0
        },
        average_toughness: if creatures_with_stats > 0 {
            total_toughness as f64 / f64::from(creatures_with_stats)
        } else {
            0.0
        },
    };

    DeckStatistics {
        total_mainboard,
        total_sideboard,
        total_cards: total_mainboard.saturating_add(total_sideboard),
        mana_curve,
        max_cmc,
        average_cmc,
        colors,
        types,
        lands: LandStats {
            total: land_total,
            basic: land_basic,
            non_basic: land_non_basic,
            ratio,
            recommended,
            status,
            status_message,
        },
        creatures,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
