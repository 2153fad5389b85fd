// Collection gap analysis.
//
// Diffs what a deck (or a full set) needs against what the player owns and
// prices the shortfall in wildcards. Set completion counts a playset of each
// non-basic card; deck completion counts exactly what the list asks for.

use std::collections::HashMap;

use serde::Serialize;

use crate::card::{ArenaId, Rarity};
use crate::deck::{DeckCard, FormatRules};
use crate::lookup::{CardCatalog, CardMetadataLookup, CollectionQuantities};

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// A card the player wants, and how many copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetCard {
    pub card_id: ArenaId,
    pub name: Option<String>,
    pub rarity: Rarity,
    pub needed: u32,
    pub is_basic_land: bool,
}

/// What the diff is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Exact deck requirement: each target's `needed` count, uncapped.
    Deck,
    /// Full set: `copies_cap` of every non-basic card; owned copies above the
    /// cap do not count.
    Set { copies_cap: u32 },
}

/// Build deck-completion targets. Quantities of the same card on both boards
/// are summed, since the copies have to be owned either way.
pub fn deck_targets<C: CardMetadataLookup + ?Sized>(
    cards: &[DeckCard],
    catalog: &C,
    rules: &FormatRules,
) -> Vec<TargetCard> {
    let mut targets: Vec<TargetCard> = Vec::new();
    let mut index: HashMap<ArenaId, usize> = HashMap::new();

    for entry in cards {
        if let Some(&i) = index.get(&entry.card_id) {
            targets[i].needed = targets[i].needed.saturating_add(entry.quantity);
            continue;
        }
        let meta = catalog.get_card(entry.card_id);
        let is_basic_land = rules.is_basic_land_id(entry.card_id)
            || meta.as_ref().is_some_and(|m| rules.is_basic_land(m));
        index.insert(entry.card_id, targets.len());
        targets.push(TargetCard {
            card_id: entry.card_id,
            rarity: meta.as_ref().map_or(Rarity::Unknown, |m| m.rarity),
            name: meta.map(|m| m.name),
            needed: entry.quantity,
            is_basic_land,
        });
    }
    targets
}

/// Build set-completion targets: every card of the set, `copies_cap` each.
pub fn set_targets(
    catalog: &CardCatalog,
    set_code: &str,
    copies_cap: u32,
    rules: &FormatRules,
) -> Vec<TargetCard> {
    catalog
        .cards_in_set(set_code)
        .into_iter()
        .map(|card| TargetCard {
            card_id: card.arena_id,
            name: Some(card.name.clone()),
            rarity: card.rarity,
            needed: copies_cap,
            is_basic_land: rules.is_basic_land(card),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Wildcards needed, by rarity. `total` is always the sum of the buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WildcardCost {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub mythic: u32,
    pub total: u32,
}

impl WildcardCost {
    /// Add `count` wildcards of `rarity`. Rarities without a wildcard are
    /// ignored.
    pub fn add(&mut self, rarity: Rarity, count: u32) {
        let bucket = match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Uncommon => &mut self.uncommon,
            Rarity::Rare => &mut self.rare,
            Rarity::Mythic => &mut self.mythic,
            Rarity::Special | Rarity::Basic | Rarity::Unknown => return,
        };
        *bucket = bucket.saturating_add(count);
        self.total = self.total.saturating_add(count);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCard {
    pub card_id: ArenaId,
    pub name: Option<String>,
    pub rarity: Rarity,
    pub needed_more: u32,
    /// Owned copies; capped in set mode.
    pub owned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionGap {
    /// Sorted mythic first, then rare, uncommon, common, everything else.
    pub missing_cards: Vec<MissingCard>,
    pub wildcard_cost: WildcardCost,
    /// Missing copies across all rarities, including ones without wildcards.
    pub total_missing: u32,
    pub unique_missing: usize,
    pub is_complete: bool,
    /// Owned share of the possible copies, set mode only.
    pub completion_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Diff targets against owned quantities. Ids missing from `owned` count as
/// zero owned; shortfalls never go negative.
pub fn diff(
    targets: &[TargetCard],
    owned: &HashMap<ArenaId, u32>,
    mode: CompletionMode,
) -> CollectionGap {
    let mut missing_cards = Vec::new();
    let mut wildcard_cost = WildcardCost::default();
    let mut total_missing = 0u32;
    let (mut total_possible, mut total_owned) = (0u64, 0u64);

    for target in targets {
        let have = owned.get(&target.card_id).copied().unwrap_or(0);
        let (shortfall, reported_owned) = match mode {
            CompletionMode::Deck => (target.needed.saturating_sub(have), have),
            CompletionMode::Set { copies_cap } => {
                if target.is_basic_land {
                    continue;
                }
                let capped = have.min(copies_cap);
                total_possible += u64::from(copies_cap);
                total_owned += u64::from(capped);
                (copies_cap - capped, capped)
            }
        };
        if shortfall == 0 {
            continue;
        }
        total_missing = total_missing.saturating_add(shortfall);
        wildcard_cost.add(target.rarity, shortfall);
        missing_cards.push(MissingCard {
            card_id: target.card_id,
            name: target.name.clone(),
            rarity: target.rarity,
            needed_more: shortfall,
            owned: reported_owned,
        });
    }

    missing_cards.sort_by_key(|m| std::cmp::Reverse(m.rarity.display_priority()));

    let completion_pct = match mode {
        CompletionMode::Deck => None,
        CompletionMode::Set { .. } if total_possible == 0 => Some(0.0),
        CompletionMode::Set { .. } => Some(total_owned as f64 / total_possible as f64 * 100.0),
    };

    CollectionGap {
        unique_missing: missing_cards.len(),
        missing_cards,
        wildcard_cost,
        total_missing,
        is_complete: total_missing == 0,
        completion_pct,
    }
}

/// Same as [`diff`], asking a collection source for the owned counts.
pub fn diff_collection<Q: CollectionQuantities + ?Sized>(
    targets: &[TargetCard],
    collection: &Q,
    mode: CompletionMode,
) -> CollectionGap {
    let ids: Vec<ArenaId> = targets.iter().map(|t| t.card_id).collect();
    let owned = collection.get_owned(&ids);
    diff(targets, &owned, mode)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
