// Pick quality grading.
//
// A pick is graded relative to the best card in the pack it was taken
// from: the ratio of the picked card's GIHWR to the pack's best GIHWR is
// mapped onto a letter ladder. Rank and alternatives tell the drafter which
// cards would have been stronger.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::ArenaId;
use crate::draft::recommend::Pack;
use crate::letter::LetterGrade;
use crate::lookup::{RatingLookup, RatingScope};

/// Alternatives reported per pick.
const MAX_ALTERNATIVES: usize = 3;

/// Ratio ladder, evaluated high to low.
const RATIO_LADDER: [(f64, LetterGrade); 9] = [
    (0.95, LetterGrade::APlus),
    (0.85, LetterGrade::A),
    (0.75, LetterGrade::AMinus),
    (0.65, LetterGrade::BPlus),
    (0.55, LetterGrade::B),
    (0.45, LetterGrade::BMinus),
    (0.35, LetterGrade::CPlus),
    (0.25, LetterGrade::C),
    (0.15, LetterGrade::CMinus),
];

/// Grade a picked card's win rate relative to the pack's best.
///
/// A pack best of zero (nothing rated) short-circuits to C instead of
/// dividing by zero.
pub fn grade_for_ratio(picked_win_rate: f64, pack_best_win_rate: f64) -> LetterGrade {
    if pack_best_win_rate <= 0.0 || !pack_best_win_rate.is_finite() {
        return LetterGrade::C;
    }
    let ratio = picked_win_rate / pack_best_win_rate;
    RATIO_LADDER
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::D)
}

// ---------------------------------------------------------------------------
// PickQuality
// ---------------------------------------------------------------------------

/// A card the drafter could have taken instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub card_id: ArenaId,
    /// GIHWR as a fraction.
    pub win_rate: f64,
}

/// Quality of one pick. `grade` is `None` when the pick could not be
/// graded (shown as "N/A"); rank is 0 in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickQuality {
    pub grade: Option<LetterGrade>,
    pub rank: u32,
    pub picked_card_win_rate: f64,
    pub pack_best_win_rate: f64,
    pub alternatives: Vec<Alternative>,
}

impl PickQuality {
    pub fn not_available() -> Self {
        PickQuality {
            grade: None,
            rank: 0,
            picked_card_win_rate: 0.0,
            pack_best_win_rate: 0.0,
            alternatives: Vec::new(),
        }
    }

    pub fn grade_label(&self) -> &'static str {
        self.grade.map_or("N/A", |g| g.label())
    }
}

/// Grade the pick of `picked` out of the pack `pack_card_ids`.
///
/// If the picked card has no rating the result is N/A. Unrated pack cards
/// are ignored, and duplicate ids in the pack are counted once. Rank is 1
/// plus the number of pack cards with a strictly higher win rate.
/// Alternatives are the cards at or above the picked card's win rate,
/// highest first (pack order among ties), at most three.
pub fn grade_pick<L: RatingLookup + ?Sized>(
    pack_card_ids: &[ArenaId],
    picked: ArenaId,
    scope: RatingScope<'_, L>,
) -> PickQuality {
    let Some(picked_rating) = scope.rating(picked) else {
        debug!("grade pick: no rating for picked card {picked}");
        return PickQuality::not_available();
    };
    let picked_wr = picked_rating.win_rate_in_hand;

    let mut seen: HashSet<ArenaId> = HashSet::new();
    let mut pack_rates: Vec<(ArenaId, f64)> = Vec::with_capacity(pack_card_ids.len());
    for &card_id in pack_card_ids {
        if !seen.insert(card_id) {
            continue;
        }
        if let Some(rating) = scope.rating(card_id) {
            pack_rates.push((card_id, rating.win_rate_in_hand));
        }
    }

    let pack_best = pack_rates
        .iter()
        .map(|(_, wr)| *wr)
        .fold(0.0_f64, f64::max);
    let grade = grade_for_ratio(picked_wr, pack_best);
    let rank = 1 + pack_rates.iter().filter(|(_, wr)| *wr > picked_wr).count() as u32;

    let mut alternatives: Vec<Alternative> = pack_rates
        .iter()
        .filter(|(id, wr)| *id != picked && *wr >= picked_wr)
        .map(|&(card_id, win_rate)| Alternative { card_id, win_rate })
        .collect();
    alternatives.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    alternatives.truncate(MAX_ALTERNATIVES);

    PickQuality {
        grade: Some(grade),
        rank,
        picked_card_win_rate: picked_wr,
        pack_best_win_rate: pack_best,
        alternatives,
    }
}

// ---------------------------------------------------------------------------
// Session analysis
// ---------------------------------------------------------------------------

/// A pick as recorded in a draft log. Coordinates are 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedPick {
    pub pack_number: u32,
    pub pick_number: u32,
    pub card_id: ArenaId,
}

/// A recorded pick together with its quality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradedPick {
    pub pack_number: u32,
    pub pick_number: u32,
    pub card_id: ArenaId,
    pub name: Option<String>,
    pub quality: PickQuality,
}

/// Grade every pick of a session against the pack it was taken from.
///
/// Picks without a matching pack (same pack and pick number) are N/A. When
/// the log holds two packs with the same coordinates the later one is used.
pub fn analyze_session<L: RatingLookup + ?Sized>(
    picks: &[RecordedPick],
    packs: &[Pack],
    scope: RatingScope<'_, L>,
) -> Vec<GradedPick> {
    let by_coordinates: HashMap<(u32, u32), &Pack> = packs
        .iter()
        .map(|p| ((p.pack_number, p.pick_number), p))
        .collect();

    picks
        .iter()
        .map(|pick| {
            let quality = match by_coordinates.get(&(pick.pack_number, pick.pick_number)) {
                Some(pack) => grade_pick(&pack.card_ids, pick.card_id, scope),
                None => {
                    debug!(
                        "no pack recorded for P{}P{}, pick is N/A",
                        pick.pack_number + 1,
                        pick.pick_number + 1
                    );
                    PickQuality::not_available()
                }
            };
            GradedPick {
                pack_number: pick.pack_number,
                pick_number: pick.pick_number,
                card_id: pick.card_id,
                name: scope.rating(pick.card_id).map(|r| r.name),
                quality,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
