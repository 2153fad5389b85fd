// Property-based tests for the engine's numeric invariants.

use std::collections::HashMap;

use pickwise_core::collection::{diff, CompletionMode, TargetCard};
use pickwise_core::draft::{grade_pick, recommend, ScoringWeights};
use pickwise_core::{ArenaId, CardRating, ColorSet, LetterGrade, Rarity, RatingScope, RatingTable, Tier};
use proptest::prelude::*;

const SET: &str = "TST";
const FORMAT: &str = "PremierDraft";

fn rarity() -> impl Strategy<Value = Rarity> {
    prop_oneof![
        Just(Rarity::Common),
        Just(Rarity::Uncommon),
        Just(Rarity::Rare),
        Just(Rarity::Mythic),
        Just(Rarity::Special),
        Just(Rarity::Unknown),
    ]
}

/// Pack of distinct ids with (win rate, ALSA, colors) per card.
fn pack() -> impl Strategy<Value = Vec<(f64, f64, String)>> {
    prop::collection::vec((0.30f64..0.75, 1.0f64..15.0, "[WUBRG]{0,2}"), 1..15)
}

fn table_for(cards: &[(f64, f64, String)]) -> RatingTable {
    let mut table = RatingTable::new();
    for (i, (wr, alsa, colors)) in cards.iter().enumerate() {
        table.insert(
            SET,
            FORMAT,
            CardRating {
                arena_id: i as ArenaId,
                name: format!("Card {i}"),
                rarity: Rarity::Common,
                colors: ColorSet::parse(colors),
                win_rate_in_hand: *wr,
                avg_last_seen_at: *alsa,
            },
        );
    }
    table
}

proptest! {
    /// Tier never gets worse as the win rate rises.
    #[test]
    fn prop_tier_is_monotonic(a in -10.0f64..110.0, b in -10.0f64..110.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Tier::classify(lo) <= Tier::classify(hi));
    }

    /// Wildcard total always equals the sum of its buckets, and shortfalls
    /// never exceed what was asked for.
    #[test]
    fn prop_wildcard_total_is_bucket_sum(
        cards in prop::collection::vec((rarity(), 0u32..6, 0u32..8), 1..40),
        set_mode in any::<bool>(),
    ) {
        let targets: Vec<TargetCard> = cards
            .iter()
            .enumerate()
            .map(|(i, (rarity, needed, _))| TargetCard {
                card_id: i as ArenaId,
                name: None,
                rarity: *rarity,
                needed: *needed,
                is_basic_land: false,
            })
            .collect();
        let owned: HashMap<ArenaId, u32> = cards
            .iter()
            .enumerate()
            .map(|(i, (_, _, have))| (i as ArenaId, *have))
            .collect();
        let mode = if set_mode { CompletionMode::Set { copies_cap: 4 } } else { CompletionMode::Deck };

        let gap = diff(&targets, &owned, mode);
        let w = gap.wildcard_cost;
        prop_assert_eq!(w.total, w.common + w.uncommon + w.rare + w.mythic);
        prop_assert!(w.total <= gap.total_missing);
        prop_assert_eq!(gap.is_complete, gap.total_missing == 0);
        for missing in &gap.missing_cards {
            prop_assert!(missing.needed_more > 0);
            if set_mode {
                prop_assert!(missing.needed_more <= 4);
            }
        }
        if let Some(pct) = gap.completion_pct {
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }

    /// Exactly one card is recommended, and nothing outscores it.
    #[test]
    fn prop_exactly_one_recommendation(cards in pack(), pool in "[WUBRG]{0,3}", pool_size in 0usize..30) {
        let table = table_for(&cards);
        let ids: Vec<ArenaId> = (0..cards.len() as ArenaId).collect();
        let recs = recommend(
            &ids,
            &ColorSet::parse(&pool),
            pool_size,
            RatingScope::new(&table, SET, FORMAT),
            &ScoringWeights::default(),
        );
        prop_assert_eq!(recs.iter().filter(|r| r.is_recommended).count(), 1);
        let best = recs.iter().find(|r| r.is_recommended).map(|r| r.score).unwrap_or(f64::NAN);
        for r in &recs {
            prop_assert!(r.score <= best);
            prop_assert!((0.0..=1.0).contains(&r.score));
        }
    }

    /// Taking the best card in the pack is always A+ at rank 1.
    #[test]
    fn prop_best_pick_is_a_plus(cards in pack()) {
        let table = table_for(&cards);
        let ids: Vec<ArenaId> = (0..cards.len() as ArenaId).collect();
        let best = cards
            .iter()
            .enumerate()
            .max_by(|a, b| a.1 .0.partial_cmp(&b.1 .0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i as ArenaId)
            .unwrap_or(0);
        let quality = grade_pick(&ids, best, RatingScope::new(&table, SET, FORMAT));
        prop_assert_eq!(quality.grade, Some(LetterGrade::APlus));
        prop_assert_eq!(quality.rank, 1);
        prop_assert!(quality.alternatives.len() <= 3);
    }
}
