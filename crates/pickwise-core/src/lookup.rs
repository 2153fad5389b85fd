// Lookup seams between the engine and its data sources.
//
// The analyzers never fetch anything themselves. Callers hand them something
// implementing these traits: an in-memory table loaded from disk, a cache in
// front of a remote service, or a stub in tests.

use std::collections::HashMap;

use crate::card::{ArenaId, CardMetadata, CardRating};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Source of per-card ratings, keyed by set, format and card id.
pub trait RatingLookup {
    fn get_rating(&self, set_code: &str, format: &str, card_id: ArenaId) -> Option<CardRating>;
}

/// Source of static card data.
pub trait CardMetadataLookup {
    fn get_card(&self, card_id: ArenaId) -> Option<CardMetadata>;
}

/// Source of owned-copy counts. Ids the source does not know about are
/// simply absent from the returned map (treated as zero owned).
pub trait CollectionQuantities {
    fn get_owned(&self, card_ids: &[ArenaId]) -> HashMap<ArenaId, u32>;
}

impl CollectionQuantities for HashMap<ArenaId, u32> {
    fn get_owned(&self, card_ids: &[ArenaId]) -> HashMap<ArenaId, u32> {
        card_ids
            .iter()
            .filter_map(|id| self.get(id).map(|qty| (*id, *qty)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// RatingScope
// ---------------------------------------------------------------------------

/// A rating lookup pinned to one (set, format) pair, which is how every
/// draft analyzer consumes ratings.
pub struct RatingScope<'a, L: ?Sized> {
    pub lookup: &'a L,
    pub set_code: &'a str,
    pub format: &'a str,
}

impl<'a, L: RatingLookup + ?Sized> RatingScope<'a, L> {
    pub fn new(lookup: &'a L, set_code: &'a str, format: &'a str) -> Self {
        RatingScope {
            lookup,
            set_code,
            format,
        }
    }

    pub fn rating(&self, card_id: ArenaId) -> Option<CardRating> {
        self.lookup.get_rating(self.set_code, self.format, card_id)
    }
}

impl<L: ?Sized> Clone for RatingScope<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: ?Sized> Copy for RatingScope<'_, L> {}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

/// Ratings held in memory, grouped by (set code, format).
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    scopes: HashMap<(String, String), HashMap<ArenaId, CardRating>>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a rating under the given set and format.
    pub fn insert(&mut self, set_code: &str, format: &str, rating: CardRating) {
        self.scopes
            .entry((set_code.to_string(), format.to_string()))
            .or_default()
            .insert(rating.arena_id, rating);
    }

    /// Number of ratings stored for one (set, format).
    pub fn len_for(&self, set_code: &str, format: &str) -> usize {
        self.scopes
            .get(&(set_code.to_string(), format.to_string()))
            .map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.values().all(HashMap::is_empty)
    }
}

impl RatingLookup for RatingTable {
    fn get_rating(&self, set_code: &str, format: &str, card_id: ArenaId) -> Option<CardRating> {
        self.scopes
            .get(&(set_code.to_string(), format.to_string()))
            .and_then(|cards| cards.get(&card_id))
            .cloned()
    }
}

/// Card metadata held in memory, keyed by arena id.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<ArenaId, CardMetadata>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: CardMetadata) {
        self.cards.insert(card.arena_id, card);
    }

    pub fn get(&self, card_id: ArenaId) -> Option<&CardMetadata> {
        self.cards.get(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardMetadata> {
        self.cards.values()
    }

    /// All cards of one set (case-insensitive match), sorted by arena id so
    /// callers get a stable order.
    pub fn cards_in_set(&self, set_code: &str) -> Vec<&CardMetadata> {
        let mut cards: Vec<&CardMetadata> = self
            .cards
            .values()
            .filter(|c| c.set_code.eq_ignore_ascii_case(set_code))
            .collect();
        cards.sort_by_key(|c| c.arena_id);
        cards
    }
}

impl FromIterator<CardMetadata> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardMetadata>>(iter: I) -> Self {
        let mut catalog = CardCatalog::new();
        for card in iter {
            catalog.insert(card);
        }
        catalog
    }
}

impl CardMetadataLookup for CardCatalog {
    fn get_card(&self, card_id: ArenaId) -> Option<CardMetadata> {
        self.cards.get(&card_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{ColorSet, Rarity};

    fn rating(id: ArenaId, wr: f64) -> CardRating {
        CardRating {
            arena_id: id,
            name: format!("Card {id}"),
            rarity: Rarity::Common,
            colors: ColorSet::parse("G"),
            win_rate_in_hand: wr,
            avg_last_seen_at: 5.0,
        }
    }

    #[test]
    fn rating_table_is_scoped_by_set_and_format() {
        let mut table = RatingTable::new();
        table.insert("BLB", "PremierDraft", rating(1, 0.55));
        table.insert("BLB", "QuickDraft", rating(1, 0.51));

        let premier = RatingScope::new(&table, "BLB", "PremierDraft");
        let quick = RatingScope::new(&table, "BLB", "QuickDraft");
        assert_eq!(premier.rating(1).map(|r| r.win_rate_in_hand), Some(0.55));
        assert_eq!(quick.rating(1).map(|r| r.win_rate_in_hand), Some(0.51));
        assert!(RatingScope::new(&table, "DSK", "PremierDraft").rating(1).is_none());
        assert_eq!(table.len_for("BLB", "PremierDraft"), 1);
    }

    #[test]
    fn collection_map_omits_unknown_ids() {
        let owned: HashMap<ArenaId, u32> = [(1, 4), (2, 1)].into_iter().collect();
        let got = owned.get_owned(&[1, 3]);
        assert_eq!(got.len(), 1);
        assert_eq!(got.get(&1), Some(&4));
    }

    #[test]
    fn catalog_filters_by_set() {
        let catalog: CardCatalog = vec![
            CardMetadata::new(3, "C", "Instant", 1.0).with_set("blb"),
            CardMetadata::new(1, "A", "Sorcery", 2.0).with_set("BLB"),
            CardMetadata::new(2, "B", "Sorcery", 2.0).with_set("DSK"),
        ]
        .into_iter()
        .collect();
        let ids: Vec<ArenaId> = catalog.cards_in_set("BLB").iter().map(|c| c.arena_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(catalog.get_card(2).map(|c| c.name), Some("B".to_string()));
    }
}
