// JSON reports produced by the CLI commands.
//
// Each builder takes already-loaded data, pins ratings to the configured
// (set, format) scope and runs the matching engine operation. Nothing here
// touches the filesystem.

use chrono::{DateTime, Utc};
use pickwise_core::collection::{self, CollectionGap, CompletionMode};
use pickwise_core::deck::{self, DeckCard, DeckFormat, DeckStatistics, Format, LegalityResult};
use pickwise_core::draft::{
    self, Classification, DraftReview, GradedPick, Pack, PackRecommendation, PackSignals,
    PickQuality, DEFAULT_PACK_SIZE,
};
use pickwise_core::{
    ArenaId, CardCatalog, CardMetadataLookup, CollectionQuantities, RatingLookup, RatingScope,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::Config;
use crate::data::DraftSession;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Every command's output: the command name, a timestamp and the result.
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub command: &'static str,
    pub generated_at: DateTime<Utc>,
    pub result: T,
}

impl<T: Serialize> Report<T> {
    pub fn new(command: &'static str, result: T) -> Self {
        Report {
            command,
            generated_at: Utc::now(),
            result,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn scope<'a, L: RatingLookup + ?Sized>(config: &'a Config, ratings: &'a L) -> RatingScope<'a, L> {
    RatingScope::new(ratings, &config.draft.set_code, &config.draft.format)
}

// ---------------------------------------------------------------------------
// Draft reports
// ---------------------------------------------------------------------------

pub fn recommend_report<L: RatingLookup + ?Sized>(
    config: &Config,
    ratings: &L,
    pack: &Pack,
    picks: &[ArenaId],
) -> PackRecommendation {
    draft::recommend_pack(pack, picks, scope(config, ratings), &config.scoring)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickGradeReport {
    pub picked: ArenaId,
    /// Letter grade, or "N/A" when the pick could not be graded.
    pub grade: &'static str,
    pub quality: PickQuality,
}

pub fn grade_pick_report<L: RatingLookup + ?Sized>(
    config: &Config,
    ratings: &L,
    pack: &[ArenaId],
    picked: ArenaId,
) -> PickGradeReport {
    let quality = draft::grade_pick(pack, picked, scope(config, ratings));
    PickGradeReport {
        picked,
        grade: quality.grade_label(),
        quality,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftReport {
    pub session_id: Option<String>,
    pub picks: Vec<GradedPick>,
    pub review: DraftReview,
}

pub fn draft_report<L: RatingLookup + ?Sized>(
    config: &Config,
    ratings: &L,
    session: &DraftSession,
) -> DraftReport {
    let picks = draft::analyze_session(&session.picks, &session.packs, scope(config, ratings));
    let review = draft::review_draft(&picks, &config.grading);
    DraftReport {
        session_id: session.session_id.clone(),
        picks,
        review,
    }
}

/// Signals for one recorded pack, or for every pack after the first pick of
/// its round when no coordinates are given.
pub fn signals_report<L: RatingLookup + ?Sized>(
    config: &Config,
    ratings: &L,
    session: &DraftSession,
    coordinates: Option<(u32, u32)>,
) -> Vec<PackSignals> {
    let scope = scope(config, ratings);
    session
        .packs
        .iter()
        .filter(|p| match coordinates {
            Some((pack_number, pick_number)) => {
                p.pack_number == pack_number && p.pick_number == pick_number
            }
            None => p.pick_number > 0,
        })
        .filter_map(|p| {
            let signals =
                draft::taken_cards(p, &session.packs, &session.picks, scope, DEFAULT_PACK_SIZE);
            if signals.is_none() {
                debug!("no initial snapshot for {}", p.label());
            }
            signals
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Archetype reports
// ---------------------------------------------------------------------------

/// What an archetype classification looks at.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchetypeSource {
    /// The picks of a recorded draft.
    Pool(Vec<ArenaId>),
    /// A decklist; only the mainboard counts.
    Deck(Vec<DeckCard>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeReport {
    /// "pool" or "deck".
    pub source: &'static str,
    /// `None` when there were no cards to classify.
    pub classification: Option<Classification>,
}

pub fn archetype_report<C: CardMetadataLookup + ?Sized>(
    catalog: &C,
    source: &ArchetypeSource,
) -> ArchetypeReport {
    match source {
        ArchetypeSource::Pool(picks) => ArchetypeReport {
            source: "pool",
            classification: draft::classify_pool(picks, catalog),
        },
        ArchetypeSource::Deck(cards) => ArchetypeReport {
            source: "deck",
            classification: draft::classify_deck(cards, catalog),
        },
    }
}

// ---------------------------------------------------------------------------
// Deck reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckReport {
    pub deck_format: DeckFormat,
    pub statistics: DeckStatistics,
    pub legality: BTreeMap<Format, LegalityResult>,
}

pub fn deck_report<C: CardMetadataLookup + ?Sized>(
    config: &Config,
    catalog: &C,
    cards: &[DeckCard],
    deck_format: DeckFormat,
) -> DeckReport {
    DeckReport {
        deck_format,
        statistics: deck::analyze_deck(cards, catalog, &config.formats),
        legality: deck::check_legality(cards, deck_format, catalog, &config.formats),
    }
}

// ---------------------------------------------------------------------------
// Collection reports
// ---------------------------------------------------------------------------

/// What a collection diff is measured against.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionTarget {
    Deck(Vec<DeckCard>),
    Set(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    /// "deck" or the set code.
    pub target: String,
    pub gap: CollectionGap,
}

pub fn collection_report<Q: CollectionQuantities + ?Sized>(
    config: &Config,
    catalog: &CardCatalog,
    owned: &Q,
    target: &CompletionTarget,
) -> CollectionReport {
    match target {
        CompletionTarget::Deck(cards) => {
            let targets = collection::deck_targets(cards, catalog, &config.formats);
            CollectionReport {
                target: "deck".to_string(),
                gap: collection::diff_collection(&targets, owned, CompletionMode::Deck),
            }
        }
        CompletionTarget::Set(set_code) => {
            let copies_cap = config.collection.set_copies_cap;
            let targets = collection::set_targets(catalog, set_code, copies_cap, &config.formats);
            CollectionReport {
                target: set_code.clone(),
                gap: collection::diff_collection(
                    &targets,
                    owned,
                    CompletionMode::Set { copies_cap },
                ),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
