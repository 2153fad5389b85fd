// Pick recommendation scoring.
//
// Every rated card in a pack gets a score in [0, 1] built from three
// normalized factors: card quality (GIHWR), fit with the pool's colors, and
// availability (ALSA). The color factor only carries real weight once the
// pool has an identity; before that it is a flat 1.0 at a low weight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::{ArenaId, CardRating, ColorSet, Rarity};
use crate::draft::pool::infer_pool_colors;
use crate::lookup::{RatingLookup, RatingScope};
use crate::tier::Tier;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Factor weights and normalization bands for pick scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub quality_weight: f64,
    /// Color weight while the pool has no established identity.
    pub early_color_weight: f64,
    /// Color weight once the pool is established.
    pub established_color_weight: f64,
    pub availability_weight: f64,
    /// GIHWR (fraction) mapped to a quality of 0.
    pub win_rate_floor: f64,
    /// GIHWR (fraction) mapped to a quality of 1.
    pub win_rate_ceiling: f64,
    /// ALSA mapped to an availability of 1.
    pub alsa_best: f64,
    /// ALSA mapped to an availability of 0.
    pub alsa_worst: f64,
    /// Picks needed before pool colors are considered established.
    pub established_pool_size: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            quality_weight: 0.50,
            early_color_weight: 0.10,
            established_color_weight: 0.30,
            availability_weight: 0.20,
            win_rate_floor: 0.45,
            win_rate_ceiling: 0.65,
            alsa_best: 1.0,
            alsa_worst: 14.0,
            established_pool_size: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Color fit
// ---------------------------------------------------------------------------

/// How a card's colors relate to the pool's colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFit {
    /// Pool too small or colorless so far; color is not judged yet.
    Unestablished,
    /// Colorless card going into an established pool.
    Colorless,
    /// Every card color is in the pool.
    Perfect,
    /// Some but not all card colors are in the pool.
    Partial,
    /// None of the card colors are in the pool.
    OffColor,
}

impl ColorFit {
    pub fn evaluate(
        card_colors: &ColorSet,
        pool_colors: &ColorSet,
        pool_size: usize,
        weights: &ScoringWeights,
    ) -> Self {
        if pool_size < weights.established_pool_size || pool_colors.is_empty() {
            return ColorFit::Unestablished;
        }
        if card_colors.is_empty() {
            return ColorFit::Colorless;
        }
        let matching = card_colors.overlap(pool_colors);
        if matching == card_colors.len() {
            ColorFit::Perfect
        } else if matching > 0 {
            ColorFit::Partial
        } else {
            ColorFit::OffColor
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            ColorFit::Unestablished | ColorFit::Perfect => 1.0,
            ColorFit::Colorless => 0.8,
            ColorFit::Partial => 0.6,
            ColorFit::OffColor => 0.2,
        }
    }

    /// Weight of the color factor for this fit.
    pub fn weight(&self, weights: &ScoringWeights) -> f64 {
        match self {
            ColorFit::Unestablished => weights.early_color_weight,
            _ => weights.established_color_weight,
        }
    }

    fn clause(&self) -> Option<&'static str> {
        match self {
            ColorFit::Perfect => Some("matches your colors"),
            ColorFit::Partial => Some("partially on-color"),
            ColorFit::OffColor => Some("off-color"),
            ColorFit::Unestablished | ColorFit::Colorless => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-card score
// ---------------------------------------------------------------------------

/// Factor threshold above which quality and availability earn a reasoning clause.
const NOTABLE_FACTOR: f64 = 0.7;

/// The factors behind one card's recommendation score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardScore {
    pub score: f64,
    pub quality: f64,
    pub availability: f64,
    pub color_fit: ColorFit,
}

impl CardScore {
    /// Human-readable explanation, e.g. "This card high win rate card and
    /// matches your colors." Empty when no factor stands out.
    pub fn reasoning(&self) -> String {
        let mut clauses = Vec::new();
        if self.quality >= NOTABLE_FACTOR {
            clauses.push("high win rate card");
        }
        if let Some(clause) = self.color_fit.clause() {
            clauses.push(clause);
        }
        if self.availability >= NOTABLE_FACTOR {
            clauses.push("highly contested");
        }
        match clauses.split_last() {
            None => String::new(),
            Some((only, [])) => format!("This card {only}."),
            Some((last, rest)) => format!("This card {} and {last}.", rest.join(", ")),
        }
    }
}

fn normalize(value: f64, zero_at: f64, one_at: f64) -> f64 {
    let span = one_at - zero_at;
    if span == 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value - zero_at) / span).clamp(0.0, 1.0)
}

/// Score one rated card against the current pool.
///
/// The result is the weighted sum of the three factors divided by the sum of
/// the weights actually used, so it stays in [0, 1] whichever color weight
/// applies.
pub fn score_card(
    rating: &CardRating,
    pool_colors: &ColorSet,
    pool_size: usize,
    weights: &ScoringWeights,
) -> CardScore {
    let quality = normalize(
        rating.win_rate_in_hand,
        weights.win_rate_floor,
        weights.win_rate_ceiling,
    );
    let availability = normalize(rating.avg_last_seen_at, weights.alsa_worst, weights.alsa_best);
    let color_fit = ColorFit::evaluate(&rating.colors, pool_colors, pool_size, weights);
    let color_weight = color_fit.weight(weights);

    let total_weight = weights.quality_weight + color_weight + weights.availability_weight;
    let score = if total_weight > 0.0 {
        (quality * weights.quality_weight
            + color_fit.score() * color_weight
            + availability * weights.availability_weight)
            / total_weight
    } else {
        0.0
    };

    CardScore {
        score,
        quality,
        availability,
        color_fit,
    }
}

// ---------------------------------------------------------------------------
// Pack recommendations
// ---------------------------------------------------------------------------

/// The cards offered at one pick. Pack and pick numbers are 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub pack_number: u32,
    pub pick_number: u32,
    pub card_ids: Vec<ArenaId>,
}

impl Pack {
    pub fn new(pack_number: u32, pick_number: u32, card_ids: Vec<ArenaId>) -> Self {
        Pack {
            pack_number,
            pick_number,
            card_ids,
        }
    }

    /// 1-indexed display label, e.g. "Pack 1, Pick 3".
    pub fn label(&self) -> String {
        format!("Pack {}, Pick {}", self.pack_number + 1, self.pick_number + 1)
    }
}

/// Recommendation data for one card in a pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickRecommendation {
    pub card_id: ArenaId,
    pub name: String,
    pub rarity: Rarity,
    pub colors: ColorSet,
    /// GIHWR as a percentage.
    pub win_rate: f64,
    pub alsa: f64,
    pub tier: Tier,
    pub score: f64,
    pub color_fit: ColorFit,
    pub is_recommended: bool,
    pub reasoning: String,
}

/// Score every rated card of a pack.
///
/// Unrated cards are left out. Exactly one card is flagged
/// `is_recommended` when any card is rated: the highest score, with ties
/// going to the card seen first. The result is sorted by score, highest
/// first, and the sort is stable so the recommended card leads its ties.
pub fn recommend<L: RatingLookup + ?Sized>(
    card_ids: &[ArenaId],
    pool_colors: &ColorSet,
    pool_size: usize,
    scope: RatingScope<'_, L>,
    weights: &ScoringWeights,
) -> Vec<PickRecommendation> {
    let mut cards: Vec<PickRecommendation> = card_ids
        .iter()
        .filter_map(|&card_id| {
            let Some(rating) = scope.rating(card_id) else {
                debug!("recommend: no rating for card {card_id}, skipping");
                return None;
            };
            let scored = score_card(&rating, pool_colors, pool_size, weights);
            Some(PickRecommendation {
                card_id,
                name: rating.name.clone(),
                rarity: rating.rarity,
                colors: rating.colors,
                win_rate: rating.win_rate_percent(),
                alsa: rating.avg_last_seen_at,
                tier: rating.tier(),
                score: scored.score,
                color_fit: scored.color_fit,
                is_recommended: false,
                reasoning: scored.reasoning(),
            })
        })
        .collect();

    let mut best: Option<usize> = None;
    for (i, card) in cards.iter().enumerate() {
        if best.map_or(true, |b| card.score > cards[b].score) {
            best = Some(i);
        }
    }
    if let Some(i) = best {
        cards[i].is_recommended = true;
    }

    cards.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    cards
}

/// A pack with its recommendations and the pool context they were made in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackRecommendation {
    pub pack_number: u32,
    pub pick_number: u32,
    pub pack_label: String,
    pub pool_colors: ColorSet,
    pub pool_size: usize,
    pub cards: Vec<PickRecommendation>,
    pub recommended: Option<PickRecommendation>,
}

/// Infer the pool colors from `picks` and recommend a pick from `pack`.
pub fn recommend_pack<L: RatingLookup + ?Sized>(
    pack: &Pack,
    picks: &[ArenaId],
    scope: RatingScope<'_, L>,
    weights: &ScoringWeights,
) -> PackRecommendation {
    let pool_colors = infer_pool_colors(picks, scope);
    let cards = recommend(&pack.card_ids, &pool_colors, picks.len(), scope, weights);
    let recommended = cards.iter().find(|c| c.is_recommended).cloned();

    PackRecommendation {
        pack_number: pack.pack_number,
        pick_number: pack.pick_number,
        pack_label: pack.label(),
        pool_colors,
        pool_size: picks.len(),
        cards,
        recommended,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
