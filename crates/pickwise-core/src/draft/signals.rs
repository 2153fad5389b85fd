// Pack signals: which cards other drafters took from a pack.
//
// The first time a pack is seen it is full. Comparing that snapshot with the
// pack as it comes around now, minus what we took ourselves, shows what the
// neighbours are drafting.

use std::collections::HashSet;

use serde::Serialize;

use crate::card::ArenaId;
use crate::draft::pick_quality::RecordedPick;
use crate::draft::recommend::Pack;
use crate::lookup::{RatingLookup, RatingScope};
use crate::tier::Tier;

/// Cards in a freshly opened pack.
pub const DEFAULT_PACK_SIZE: f64 = 15.0;

/// Below this ALSA a card is never expected to come back.
const MIN_WHEEL_ALSA: f64 = 2.0;

/// Rough chance (0-100) that a card with the given ALSA comes back around.
///
/// Cards usually gone by pick 2 never wheel; otherwise each pick of ALSA
/// beyond the pack size adds ten points, capped at 100.
pub fn wheel_probability(alsa: f64, pack_size: f64) -> f64 {
    if alsa.is_nan() || alsa < MIN_WHEEL_ALSA {
        return 0.0;
    }
    ((alsa - pack_size) * 10.0).clamp(0.0, 100.0)
}

/// A card another drafter took from the pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakenCard {
    pub card_id: ArenaId,
    pub name: Option<String>,
    /// GIHWR as a percentage, when rated.
    pub win_rate: Option<f64>,
    pub tier: Option<Tier>,
    pub wheel_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackSignals {
    pub pack_number: u32,
    pub pick_number: u32,
    pub initial_cards: Vec<ArenaId>,
    pub current_cards: Vec<ArenaId>,
    pub picked_by_me: Vec<ArenaId>,
    pub taken: Vec<TakenCard>,
    pub total_taken: usize,
    /// Taken cards rated in the top tier.
    pub strong_cards_taken: usize,
}

/// Work out what was taken from `current`'s pack since it was first seen.
///
/// The initial snapshot is the recorded pack with the same pack number and
/// the lowest pick number. Returns `None` when no such snapshot exists.
pub fn taken_cards<L: RatingLookup + ?Sized>(
    current: &Pack,
    packs: &[Pack],
    picks: &[RecordedPick],
    scope: RatingScope<'_, L>,
    pack_size: f64,
) -> Option<PackSignals> {
    let initial = packs
        .iter()
        .filter(|p| p.pack_number == current.pack_number)
        .min_by_key(|p| p.pick_number)?;

    let picked_by_me: Vec<ArenaId> = picks
        .iter()
        .filter(|p| p.pack_number == current.pack_number && p.pick_number < current.pick_number)
        .map(|p| p.card_id)
        .collect();

    let still_here: HashSet<ArenaId> = current.card_ids.iter().copied().collect();
    let mine: HashSet<ArenaId> = picked_by_me.iter().copied().collect();

    let taken: Vec<TakenCard> = initial
        .card_ids
        .iter()
        .filter(|id| !still_here.contains(*id) && !mine.contains(*id))
        .map(|&card_id| match scope.rating(card_id) {
            Some(rating) => TakenCard {
                card_id,
                name: Some(rating.name.clone()),
                win_rate: Some(rating.win_rate_percent()),
                tier: Some(rating.tier()),
                wheel_probability: wheel_probability(rating.avg_last_seen_at, pack_size),
            },
            None => TakenCard {
                card_id,
                name: None,
                win_rate: None,
                tier: None,
                wheel_probability: 0.0,
            },
        })
        .collect();

    let strong_cards_taken = taken.iter().filter(|c| c.tier == Some(Tier::S)).count();

    Some(PackSignals {
        pack_number: current.pack_number,
        pick_number: current.pick_number,
        initial_cards: initial.card_ids.clone(),
        current_cards: current.card_ids.clone(),
        picked_by_me,
        total_taken: taken.len(),
        taken,
        strong_cards_taken,
    })
}
