// Integration tests for the analytics engine.
//
// These exercise the public API the way the application does: ratings and
// card metadata in in-memory tables, a draft flowing from recommendation to
// pick grading to a draft grade, and a deck through statistics, legality and
// collection diff.

use std::collections::HashMap;

use pickwise_core::collection::{deck_targets, diff, CompletionMode};
use pickwise_core::deck::{analyze_deck, check_legality, DeckCard, DeckFormat, Format, FormatRules, LandStatus};
use pickwise_core::draft::{
    analyze_session, grade_pick, recommend, recommend_pack, review_draft, ColorFit, GradeLedger,
    GradeWeights, Pack, RecordedPick, ScoringWeights,
};
use pickwise_core::{
    ArenaId, CardCatalog, CardMetadata, CardRating, ColorSet, LetterGrade, Rarity, RatingScope,
    RatingTable,
};

// ===========================================================================
// Test helpers
// ===========================================================================

const SET: &str = "TST";
const FORMAT: &str = "PremierDraft";

const CARD_A: ArenaId = 1001;
const CARD_B: ArenaId = 1002;

fn rating(id: ArenaId, name: &str, win_rate: f64, alsa: f64, colors: &str) -> CardRating {
    CardRating {
        arena_id: id,
        name: name.to_string(),
        rarity: Rarity::Uncommon,
        colors: ColorSet::parse(colors),
        win_rate_in_hand: win_rate,
        avg_last_seen_at: alsa,
    }
}

/// Two-card pack from the reference scenario plus five red pool cards.
fn scenario_ratings() -> RatingTable {
    let mut table = RatingTable::new();
    table.insert(SET, FORMAT, rating(CARD_A, "Card A", 0.62, 2.0, "R"));
    table.insert(SET, FORMAT, rating(CARD_B, "Card B", 0.50, 8.0, "W"));
    for (i, wr) in [0.55, 0.56, 0.57, 0.54, 0.53].into_iter().enumerate() {
        let id = 2000 + i as ArenaId;
        table.insert(SET, FORMAT, rating(id, &format!("Red {i}"), wr, 5.0, "R"));
    }
    table
}

// ===========================================================================
// Draft flow
// ===========================================================================

#[test]
fn reference_pack_recommends_the_red_card() {
    let table = scenario_ratings();
    let scope = RatingScope::new(&table, SET, FORMAT);
    let recs = recommend(
        &[CARD_A, CARD_B],
        &ColorSet::parse("R"),
        5,
        scope,
        &ScoringWeights::default(),
    );

    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].card_id, CARD_A);
    assert!(recs[0].is_recommended);
    assert!(!recs[1].is_recommended);
    assert!(recs[0].score > recs[1].score);
    assert_eq!(recs[0].color_fit, ColorFit::Perfect);
    assert_eq!(recs[1].color_fit, ColorFit::OffColor);
}

#[test]
fn reference_pick_of_the_weaker_card_grades_a_minus() {
    let table = scenario_ratings();
    let scope = RatingScope::new(&table, SET, FORMAT);
    let quality = grade_pick(&[CARD_A, CARD_B], CARD_B, scope);

    assert_eq!(quality.grade, Some(LetterGrade::AMinus));
    assert_eq!(quality.rank, 2);
    assert_eq!(quality.alternatives.len(), 1);
    assert_eq!(quality.alternatives[0].card_id, CARD_A);
    assert!((quality.picked_card_win_rate / quality.pack_best_win_rate - 0.50 / 0.62).abs() < 1e-9);
}

#[test]
fn recommend_pack_infers_pool_from_picks() {
    let table = scenario_ratings();
    let scope = RatingScope::new(&table, SET, FORMAT);
    let picks: Vec<ArenaId> = (2000..2005).collect();
    let pack = Pack::new(0, 5, vec![CARD_B, CARD_A]);

    let rec = recommend_pack(&pack, &picks, scope, &ScoringWeights::default());
    assert_eq!(rec.pack_label, "Pack 1, Pick 6");
    assert_eq!(rec.pool_colors.to_string(), "R");
    assert_eq!(rec.pool_size, 5);
    assert_eq!(rec.recommended.map(|r| r.card_id), Some(CARD_A));
}

#[test]
fn session_grades_feed_the_ledger() {
    let table = scenario_ratings();
    let scope = RatingScope::new(&table, SET, FORMAT);
    let picks = vec![
        RecordedPick { pack_number: 0, pick_number: 0, card_id: CARD_A },
        RecordedPick { pack_number: 0, pick_number: 1, card_id: CARD_B },
        RecordedPick { pack_number: 0, pick_number: 2, card_id: 2000 },
    ];
    let packs = vec![
        Pack::new(0, 0, vec![CARD_A, CARD_B, 2001]),
        Pack::new(0, 1, vec![CARD_B, 2002]),
    ];

    let graded = analyze_session(&picks, &packs, scope);
    assert_eq!(graded[0].quality.grade, Some(LetterGrade::APlus));
    assert_eq!(graded[1].quality.rank, 2);
    assert_eq!(graded[2].quality.grade_label(), "N/A");

    let review = review_draft(&graded, &GradeWeights::default());
    let mut ledger = GradeLedger::new();
    assert!(ledger.get("session-1").is_none());
    ledger.record("session-1", review.grade.clone());
    assert_eq!(ledger.get("session-1"), Some(&review.grade));
    assert!(review.grade.overall_score <= 100);
    assert_eq!(review.best_picks[0].card_id, CARD_A);
}

// ===========================================================================
// Deck flow
// ===========================================================================

fn deck_catalog() -> CardCatalog {
    let mut catalog: CardCatalog = (1..=9)
        .map(|id| {
            CardMetadata::new(id, format!("Spell {id}"), "Creature — Elf", 2.5)
                .with_mana_cost("{1}{G}")
                .with_rarity(if id % 3 == 0 { Rarity::Rare } else { Rarity::Common })
                .with_power_toughness("2", "2")
        })
        .collect();
    catalog.insert(
        CardMetadata::new(50, "Forest", "Basic Land — Forest", 0.0).with_rarity(Rarity::Basic),
    );
    catalog
}

#[test]
fn sixty_card_deck_statistics_and_legality() {
    let catalog = deck_catalog();
    let rules = FormatRules::default();
    let mut deck: Vec<DeckCard> = (1..=9).map(|id| DeckCard::main(id, 4)).collect();
    deck.push(DeckCard::main(50, 24));

    let stats = analyze_deck(&deck, &catalog, &rules);
    assert_eq!(stats.total_mainboard, 60);
    assert!((stats.average_cmc - 2.5).abs() < 1e-12);
    assert_eq!(stats.lands.recommended, 24);
    assert_eq!(stats.lands.status, LandStatus::Optimal);
    assert_eq!(stats.colors.green, 36);

    let legality = check_legality(&deck, DeckFormat::Constructed(Format::Standard), &catalog, &rules);
    for format in Format::CONSTRUCTED {
        assert!(legality[&format].legal);
    }
}

#[test]
fn sixty_singletons_with_basics_are_brawl_legal() {
    let catalog = deck_catalog();
    let rules = FormatRules::default();
    let mut deck: Vec<DeckCard> = (1..=9).map(|id| DeckCard::main(id, 1)).collect();
    deck.push(DeckCard::main(50, 51));

    let legality = check_legality(&deck, DeckFormat::Constructed(Format::Brawl), &catalog, &rules);
    assert!(legality[&Format::Brawl].legal, "{:?}", legality[&Format::Brawl].reasons);
    assert!(legality[&Format::Standard].legal);
    // 60 is not the 99 a commander deck needs.
    assert_eq!(legality[&Format::Commander].reasons.len(), 1);
}

#[test]
fn sixty_one_cards_with_five_copies_fail_only_the_copy_limit() {
    let catalog = deck_catalog();
    let rules = FormatRules::default();
    let mut deck: Vec<DeckCard> = (1..=8).map(|id| DeckCard::main(id, 4)).collect();
    deck.push(DeckCard::main(9, 5));
    deck.push(DeckCard::main(50, 24));

    let legality = check_legality(&deck, DeckFormat::Constructed(Format::Standard), &catalog, &rules);
    let standard = &legality[&Format::Standard];
    assert!(!standard.legal);
    assert_eq!(
        standard.reasons,
        vec!["Card 'Spell 9' has 5 copies (maximum 4)".to_string()]
    );
}

#[test]
fn deck_completion_prices_missing_copies() {
    let catalog = deck_catalog();
    let rules = FormatRules::default();
    let deck = vec![
        DeckCard::main(3, 4),
        DeckCard::main(1, 4),
        DeckCard::main(50, 20),
        DeckCard::sideboard(3, 1),
    ];
    let targets = deck_targets(&deck, &catalog, &rules);
    let owned: HashMap<ArenaId, u32> = [(3, 2), (1, 4), (50, 20)].into_iter().collect();

    let gap = diff(&targets, &owned, CompletionMode::Deck);
    assert_eq!(gap.total_missing, 3);
    assert_eq!(gap.wildcard_cost.rare, 3);
    assert_eq!(gap.wildcard_cost.total, 3);
    assert!(!gap.is_complete);
}
