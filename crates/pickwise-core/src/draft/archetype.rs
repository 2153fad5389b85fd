// Archetype classification for a draft pool or a deck.
//
// A pool is summarised by its color, type and curve breakdown. The colors
// holding at least 15% of the colored cards are its dominant colors; two of
// them name a guild. The curve and the creature/spell split pick a play
// style, and cards whose rules text points at a known synergy add to the
// confidence of the call.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::card::{ArenaId, CardMetadata, Color, ColorSet};
use crate::deck::{Board, DeckCard};
use crate::lookup::CardMetadataLookup;

/// Share of colored cards a color needs to count as dominant.
const DOMINANT_SHARE: f64 = 0.15;

/// Highest mana-curve bucket; everything above is grouped into it.
const CURVE_CAP: u32 = 7;

/// Indicator weight from which a card counts as a signature card.
const SIGNATURE_WEIGHT: f64 = 2.0;

const INDICATOR_BOOST: f64 = 0.05;
const MAX_INDICATOR_BOOST: f64 = 0.2;

// ---------------------------------------------------------------------------
// Color pairs
// ---------------------------------------------------------------------------

/// Guild name of a two-color pair, in either order.
pub fn guild_name(pair: ColorSet) -> Option<&'static str> {
    use crate::card::Color::*;

    let mut colors = pair.iter();
    let name = match (colors.next()?, colors.next()?, colors.next()) {
        (White, Blue, None) => "Azorius",
        (Blue, Black, None) => "Dimir",
        (Black, Red, None) => "Rakdos",
        (Red, Green, None) => "Gruul",
        (White, Green, None) => "Selesnya",
        (White, Black, None) => "Orzhov",
        (Blue, Red, None) => "Izzet",
        (Black, Green, None) => "Golgari",
        (White, Red, None) => "Boros",
        (Blue, Green, None) => "Simic",
        _ => return None,
    };
    Some(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub colors: ColorSet,
    pub name: &'static str,
}

/// The guild for exactly two dominant colors.
pub fn color_pair(dominant: &[Color]) -> Option<ColorPair> {
    if dominant.len() != 2 {
        return None;
    }
    let colors: ColorSet = dominant.iter().copied().collect();
    guild_name(colors).map(|name| ColorPair { colors, name })
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Color, type, curve and rarity breakdown of a pool.
///
/// Type counts follow the type line, so an artifact creature counts as both
/// an artifact and a creature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoolComposition {
    /// Colored cards per color; a gold card counts toward each of its colors.
    pub color_counts: BTreeMap<Color, u32>,
    pub colorless: u32,
    pub multicolor: u32,
    pub creatures: u32,
    pub instants: u32,
    pub sorceries: u32,
    pub artifacts: u32,
    pub enchantments: u32,
    pub planeswalkers: u32,
    pub lands: u32,
    /// Non-land cards per mana value, 7+ grouped together.
    pub mana_curve: BTreeMap<u32, u32>,
    pub average_cmc: f64,
    pub rarity_counts: BTreeMap<&'static str, u32>,
}

impl PoolComposition {
    fn add(&mut self, card: &CardMetadata, quantity: u32) {
        match card.colors.len() {
            0 => self.colorless = self.colorless.saturating_add(quantity),
            n => {
                if n > 1 {
                    self.multicolor = self.multicolor.saturating_add(quantity);
                }
                for color in card.colors.iter() {
                    let count = self.color_counts.entry(color).or_default();
                    *count = count.saturating_add(quantity);
                }
            }
        }

        let type_line = card.type_line.to_lowercase();
        for (word, slot) in [
            ("creature", &mut self.creatures),
            ("instant", &mut self.instants),
            ("sorcery", &mut self.sorceries),
            ("artifact", &mut self.artifacts),
            ("enchantment", &mut self.enchantments),
            ("planeswalker", &mut self.planeswalkers),
            ("land", &mut self.lands),
        ] {
            if type_line.contains(word) {
                *slot = slot.saturating_add(quantity);
            }
        }

        if !type_line.contains("land") {
            let cmc = if card.cmc.is_finite() && card.cmc > 0.0 {
                (card.cmc as u32).min(CURVE_CAP)
            } else {
                0
            };
            let count = self.mana_curve.entry(cmc).or_default();
            *count = count.saturating_add(quantity);
        }

        let count = self.rarity_counts.entry(card.rarity.label()).or_default();
        *count = count.saturating_add(quantity);
    }

    fn curve(&self, cmc: u32) -> u32 {
        self.mana_curve.get(&cmc).copied().unwrap_or(0)
    }

    fn non_land_types(&self) -> u32 {
        [
            self.creatures,
            self.instants,
            self.sorceries,
            self.artifacts,
            self.enchantments,
            self.planeswalkers,
        ]
        .into_iter()
        .fold(0, u32::saturating_add)
    }

    /// WUBRG identity of every color present, or "C" for a colorless pool.
    pub fn color_identity(&self) -> String {
        let identity: ColorSet = self.color_counts.keys().copied().collect();
        if identity.is_empty() {
            "C".to_string()
        } else {
            identity.to_string()
        }
    }

    /// Colors with at least 15% of the colored cards, most played first.
    /// Ties keep WUBRG order.
    pub fn dominant_colors(&self) -> Vec<Color> {
        let total = self.color_counts.values().fold(0, |acc: u32, n| acc.saturating_add(*n));
        if total == 0 {
            return Vec::new();
        }
        let mut counts: Vec<(Color, u32)> = self.color_counts.iter().map(|(c, n)| (*c, *n)).collect();
        counts.sort_by_key(|(_, n)| std::cmp::Reverse(*n));

        let threshold = f64::from(total) * DOMINANT_SHARE;
        counts
            .into_iter()
            .filter(|(_, n)| f64::from(*n) >= threshold)
            .map(|(c, _)| c)
            .collect()
    }
}

/// Build the composition of `cards` (id, quantity). A quantity of 0 counts
/// as one copy; ids with no metadata are skipped.
pub fn compose<C: CardMetadataLookup + ?Sized>(
    cards: &[(ArenaId, u32)],
    catalog: &C,
) -> (PoolComposition, Vec<(CardMetadata, u32)>) {
    let mut composition = PoolComposition::default();
    let mut known = Vec::new();
    let mut total_cmc = 0.0;
    let mut non_land = 0u32;

    for &(card_id, quantity) in cards {
        let Some(card) = catalog.get_card(card_id) else {
            debug!("archetype: no metadata for card {card_id}, skipping");
            continue;
        };
        let quantity = quantity.max(1);
        composition.add(&card, quantity);
        if !card.type_line.to_lowercase().contains("land") {
            if card.cmc.is_finite() {
                total_cmc += card.cmc * f64::from(quantity);
            }
            non_land = non_land.saturating_add(quantity);
        }
        known.push((card, quantity));
    }

    if non_land > 0 {
        composition.average_cmc = total_cmc / f64::from(non_land);
    }
    (composition, known)
}

// ---------------------------------------------------------------------------
// Play style
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayStyle {
    Aggro,
    Control,
    Midrange,
    Tempo,
}

impl PlayStyle {
    pub fn label(&self) -> &'static str {
        match self {
            PlayStyle::Aggro => "Aggro",
            PlayStyle::Control => "Control",
            PlayStyle::Midrange => "Midrange",
            PlayStyle::Tempo => "Tempo",
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Read a play style off the curve and the creature/spell split.
///
/// Checked in order: Aggro (over half the curve at 1-2, creature heavy,
/// average under 2.5), Control (a top-heavy curve, spell heavy, average over
/// 3.5), Midrange (creature leaning, average 2.5 to 3.5), Tempo (mixed
/// creatures and spells, average under 3.0).
pub fn detect_play_style(composition: &PoolComposition) -> Option<PlayStyle> {
    let non_land = composition.non_land_types();
    if non_land == 0 {
        return None;
    }
    let creature_ratio = f64::from(composition.creatures) / f64::from(non_land);
    let spell_ratio =
        f64::from(composition.instants.saturating_add(composition.sorceries)) / f64::from(non_land);

    let bucket = |cmcs: std::ops::RangeInclusive<u32>| {
        cmcs.map(|cmc| composition.curve(cmc)).fold(0, u32::saturating_add)
    };
    let low = bucket(1..=2);
    let high = bucket(5..=CURVE_CAP);
    let curve_total = bucket(1..=CURVE_CAP);
    if curve_total == 0 {
        return None;
    }
    let low_ratio = f64::from(low) / f64::from(curve_total);
    let high_ratio = f64::from(high) / f64::from(curve_total);
    let avg = composition.average_cmc;

    if low_ratio > 0.5 && creature_ratio > 0.6 && avg < 2.5 {
        Some(PlayStyle::Aggro)
    } else if high_ratio > 0.3 && spell_ratio > 0.4 && avg > 3.5 {
        Some(PlayStyle::Control)
    } else if creature_ratio > 0.4 && (2.5..=3.5).contains(&avg) {
        Some(PlayStyle::Midrange)
    } else if creature_ratio > 0.3 && spell_ratio > 0.3 && avg < 3.0 {
        Some(PlayStyle::Tempo)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Synergy indicators
// ---------------------------------------------------------------------------

/// A card whose rules text points at an archetype theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub card_id: ArenaId,
    pub card_name: String,
    pub weight: f64,
    pub reason: &'static str,
}

fn card_indicators(card: &CardMetadata, quantity: u32) -> Vec<(f64, &'static str)> {
    let Some(text) = card.oracle_text.as_deref() else {
        return Vec::new();
    };
    let text = text.to_lowercase();
    let has = |phrase: &str| text.contains(phrase);
    let mut found = Vec::new();

    if has("creatures you control with flying") || has("whenever a creature with flying") {
        found.push((2.5, "Flying synergy payoff"));
    }
    if has("sacrifice") && (has("whenever you sacrifice") || has("when this creature dies")) {
        found.push((2.0, "Sacrifice synergy"));
    }
    if has("from your graveyard") || has("in your graveyard") {
        found.push((1.5, "Graveyard synergy"));
    }
    if has("create") && has("token") && (has("whenever") || quantity >= 2) {
        found.push((1.5, "Token generation"));
    }
    if has("+1/+1 counter") && (has("whenever") || has("each creature")) {
        found.push((2.0, "+1/+1 counter synergy"));
    }
    if has("whenever you cast") && (has("instant") || has("sorcery")) {
        found.push((2.0, "Spells matter"));
    }
    if has("search your library for a") && has("land") {
        found.push((1.5, "Ramp/land search"));
    }
    found
}

/// Every synergy indicator in the pool, heaviest first.
pub fn find_indicators(cards: &[(CardMetadata, u32)]) -> Vec<Indicator> {
    let mut indicators: Vec<Indicator> = cards
        .iter()
        .flat_map(|(card, quantity)| {
            card_indicators(card, *quantity)
                .into_iter()
                .map(|(weight, reason)| Indicator {
                    card_id: card.arena_id,
                    card_name: card.name.clone(),
                    weight,
                    reason,
                })
        })
        .collect();
    indicators.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    indicators
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// e.g. "Gruul Aggro", "Mono-Red", "Multi-color Control", "Unknown".
    pub archetype: String,
    /// 0.0 to 1.0.
    pub confidence: f64,
    pub color_identity: String,
    pub dominant_colors: Vec<Color>,
    pub color_pair: Option<ColorPair>,
    pub play_style: Option<PlayStyle>,
    pub signature_cards: Vec<ArenaId>,
    pub indicators: Vec<Indicator>,
    pub total_cards: u32,
    pub composition: PoolComposition,
}

/// Classify cards given as (id, quantity). Returns `None` for an empty list.
pub fn classify_cards<C: CardMetadataLookup + ?Sized>(
    cards: &[(ArenaId, u32)],
    catalog: &C,
) -> Option<Classification> {
    if cards.is_empty() {
        return None;
    }
    let total_cards = cards
        .iter()
        .fold(0u32, |acc, (_, q)| acc.saturating_add(*q));
    let (composition, known) = compose(cards, catalog);

    let dominant_colors = composition.dominant_colors();
    let color_pair = color_pair(&dominant_colors);
    let play_style = detect_play_style(&composition);

    let (mut archetype, mut confidence) = match (&color_pair, dominant_colors.as_slice()) {
        (Some(pair), _) => (pair.name.to_string(), 0.5),
        (None, [only]) => (format!("Mono-{}", only.name()), 0.5),
        (None, colors) if colors.len() > 2 => ("Multi-color".to_string(), 0.4),
        _ => ("Unknown".to_string(), 0.2),
    };
    if let Some(style) = play_style {
        if color_pair.is_some() {
            confidence += 0.2;
        } else {
            confidence += 0.15;
        }
        archetype = if archetype == "Unknown" {
            style.label().to_string()
        } else {
            format!("{archetype} {style}")
        };
    }

    let indicators = find_indicators(&known);
    let signature_cards = indicators
        .iter()
        .filter(|i| i.weight >= SIGNATURE_WEIGHT)
        .map(|i| i.card_id)
        .collect();
    if !indicators.is_empty() {
        confidence += (indicators.len() as f64 * INDICATOR_BOOST).min(MAX_INDICATOR_BOOST);
    }

    Some(Classification {
        archetype,
        confidence: confidence.min(1.0),
        color_identity: composition.color_identity(),
        dominant_colors,
        color_pair,
        play_style,
        signature_cards,
        indicators,
        total_cards,
        composition,
    })
}

/// Classify a draft pool. A card picked more than once counts each copy.
pub fn classify_pool<C: CardMetadataLookup + ?Sized>(
    picks: &[ArenaId],
    catalog: &C,
) -> Option<Classification> {
    let mut order: Vec<ArenaId> = Vec::new();
    let mut counts: BTreeMap<ArenaId, u32> = BTreeMap::new();
    for &id in picks {
        let count = counts.entry(id).or_insert_with(|| {
            order.push(id);
            0
        });
        *count = count.saturating_add(1);
    }
    let cards: Vec<(ArenaId, u32)> = order.into_iter().map(|id| (id, counts[&id])).collect();
    classify_cards(&cards, catalog)
}

/// Classify a deck from its mainboard.
pub fn classify_deck<C: CardMetadataLookup + ?Sized>(
    cards: &[DeckCard],
    catalog: &C,
) -> Option<Classification> {
    let main: Vec<(ArenaId, u32)> = cards
        .iter()
        .filter(|c| c.board == Board::Main)
        .map(|c| (c.card_id, c.quantity))
        .collect();
    classify_cards(&main, catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rarity;
    use crate::draft::fixtures::approx_eq;
    use crate::lookup::CardCatalog;

    fn composition_with(colors: &[(Color, u32)]) -> PoolComposition {
        PoolComposition {
            color_counts: colors.iter().copied().collect(),
            ..PoolComposition::default()
        }
    }

    fn creature(id: ArenaId, cost: &str, cmc: f64) -> CardMetadata {
        CardMetadata::new(id, format!("Creature {id}"), "Creature — Warrior", cmc)
            .with_mana_cost(cost)
            .with_rarity(Rarity::Common)
            .with_power_toughness("2", "2")
    }

    fn spell(id: ArenaId, type_line: &str, cost: &str, cmc: f64) -> CardMetadata {
        CardMetadata::new(id, format!("Spell {id}"), type_line, cmc)
            .with_mana_cost(cost)
            .with_rarity(Rarity::Uncommon)
    }

    #[test]
    fn color_identity_lists_every_present_color() {
        use crate::card::Color::*;
        let cases: &[(&[(Color, u32)], &str)] = &[
            (&[(White, 10)], "W"),
            (&[(White, 10), (Blue, 10)], "WU"),
            (&[(Black, 8), (Red, 12)], "BR"),
            (&[(Black, 5), (Red, 8), (Green, 7)], "BRG"),
            (&[(White, 2), (Blue, 3), (Black, 4), (Red, 5), (Green, 6)], "WUBRG"),
            (&[], "C"),
        ];
        for (counts, want) in cases {
            assert_eq!(composition_with(counts).color_identity(), *want, "{counts:?}");
        }
    }

    #[test]
    fn dominant_colors_need_fifteen_percent() {
        use crate::card::Color::*;
        let two = composition_with(&[(White, 15), (Blue, 15), (Black, 2)]);
        assert_eq!(two.dominant_colors(), vec![White, Blue]);

        let splash = composition_with(&[(Red, 25), (Black, 3)]);
        assert_eq!(splash.dominant_colors(), vec![Red]);

        let three = composition_with(&[(Black, 10), (Red, 10), (Green, 10)]);
        assert_eq!(three.dominant_colors().len(), 3);

        assert!(composition_with(&[]).dominant_colors().is_empty());
    }

    #[test]
    fn dominant_colors_sort_by_count() {
        use crate::card::Color::*;
        let pool = composition_with(&[(White, 4), (Green, 9)]);
        assert_eq!(pool.dominant_colors(), vec![Green, White]);
    }

    #[test]
    fn every_pair_has_a_guild() {
        use crate::card::Color::*;
        let cases = [
            ([White, Blue], "Azorius"),
            ([Blue, Black], "Dimir"),
            ([Black, Red], "Rakdos"),
            ([Red, Green], "Gruul"),
            ([Green, White], "Selesnya"),
            ([White, Black], "Orzhov"),
            ([Blue, Red], "Izzet"),
            ([Black, Green], "Golgari"),
            ([Red, White], "Boros"),
            ([Green, Blue], "Simic"),
        ];
        for (colors, name) in cases {
            assert_eq!(color_pair(&colors).map(|p| p.name), Some(name), "{colors:?}");
        }
    }

    #[test]
    fn only_two_colors_form_a_pair() {
        use crate::card::Color::*;
        assert_eq!(color_pair(&[Red]), None);
        assert_eq!(color_pair(&[White, Blue, Black]), None);
        assert_eq!(color_pair(&[]), None);
    }

    #[test]
    fn composition_counts_types_curve_and_rarity() {
        let catalog: CardCatalog = vec![
            creature(1, "{R}", 1.0),
            CardMetadata::new(2, "Gold Golem", "Artifact Creature — Golem", 9.0)
                .with_mana_cost("{7}{R}{G}")
                .with_rarity(Rarity::Rare),
            spell(3, "Instant", "{1}{U}", 2.0),
            CardMetadata::new(4, "Forest", "Basic Land — Forest", 0.0).with_rarity(Rarity::Basic),
        ]
        .into_iter()
        .collect();
        let (composition, known) = compose(&[(1, 2), (2, 1), (3, 0), (4, 5), (99, 1)], &catalog);

        assert_eq!(known.len(), 4);
        assert_eq!(composition.color_counts[&Color::Red], 3);
        assert_eq!(composition.color_counts[&Color::Green], 1);
        assert_eq!(composition.multicolor, 1);
        assert_eq!(composition.colorless, 5);
        assert_eq!(composition.creatures, 3);
        assert_eq!(composition.artifacts, 1);
        // quantity 0 counts as one copy
        assert_eq!(composition.instants, 1);
        assert_eq!(composition.lands, 5);
        assert_eq!(composition.mana_curve.get(&7), Some(&1));
        assert_eq!(composition.mana_curve.get(&0), None);
        // 2x1 + 9 + 2 over 4 non-lands
        assert!(approx_eq(composition.average_cmc, 13.0 / 4.0, 1e-9));
        assert_eq!(composition.rarity_counts["basic"], 5);
        assert_eq!(composition.rarity_counts["common"], 2);
    }

    #[test]
    fn play_style_from_curve_and_ratios() {
        let aggro = PoolComposition {
            creatures: 16,
            instants: 4,
            mana_curve: [(1, 6), (2, 8), (3, 4), (4, 2)].into_iter().collect(),
            average_cmc: 2.1,
            ..PoolComposition::default()
        };
        assert_eq!(detect_play_style(&aggro), Some(PlayStyle::Aggro));

        let control = PoolComposition {
            creatures: 6,
            instants: 8,
            sorceries: 6,
            mana_curve: [(2, 4), (3, 4), (4, 4), (5, 4), (6, 4)].into_iter().collect(),
            average_cmc: 3.9,
            ..PoolComposition::default()
        };
        assert_eq!(detect_play_style(&control), Some(PlayStyle::Control));

        let midrange = PoolComposition {
            creatures: 14,
            instants: 6,
            mana_curve: [(2, 5), (3, 7), (4, 5), (5, 3)].into_iter().collect(),
            average_cmc: 3.2,
            ..PoolComposition::default()
        };
        assert_eq!(detect_play_style(&midrange), Some(PlayStyle::Midrange));

        let tempo = PoolComposition {
            creatures: 7,
            instants: 7,
            enchantments: 6,
            mana_curve: [(1, 4), (2, 6), (3, 6), (4, 4)].into_iter().collect(),
            average_cmc: 2.4,
            ..PoolComposition::default()
        };
        assert_eq!(detect_play_style(&tempo), Some(PlayStyle::Tempo));
    }

    #[test]
    fn no_play_style_without_a_curve() {
        assert_eq!(detect_play_style(&PoolComposition::default()), None);
        let zero_drops = PoolComposition {
            artifacts: 5,
            mana_curve: [(0, 5)].into_iter().collect(),
            ..PoolComposition::default()
        };
        assert_eq!(detect_play_style(&zero_drops), None);
    }

    #[test]
    fn indicators_read_rules_text() {
        let cards = vec![
            (
                spell(1, "Enchantment", "{1}{W}", 2.0)
                    .with_oracle_text("Creatures you control with flying get +1/+0."),
                1,
            ),
            (
                spell(2, "Sorcery", "{B}", 1.0)
                    .with_oracle_text("Return target creature card from your graveyard to your hand."),
                1,
            ),
            (
                spell(3, "Sorcery", "{1}{W}", 2.0).with_oracle_text("Create two 1/1 white Soldier creature tokens."),
                1,
            ),
            (creature(4, "{G}", 1.0), 3),
        ];
        let indicators = find_indicators(&cards);
        let reasons: Vec<&str> = indicators.iter().map(|i| i.reason).collect();
        // one-off token maker without "whenever" does not count
        assert_eq!(reasons, vec!["Flying synergy payoff", "Graveyard synergy"]);
        assert!(approx_eq(indicators[0].weight, 2.5, 1e-12));

        let doubled = vec![(cards[2].0.clone(), 2)];
        assert_eq!(find_indicators(&doubled)[0].reason, "Token generation");
    }

    #[test]
    fn classify_two_color_aggro_pool() {
        let mut cards: Vec<CardMetadata> = (1..=8).map(|id| creature(id, "{R}", 1.0)).collect();
        cards.extend((9..=14).map(|id| creature(id, "{1}{G}", 2.0)));
        cards.push(
            spell(15, "Instant", "{R}", 1.0)
                .with_oracle_text("Whenever you cast an instant or sorcery spell, scry 1."),
        );
        cards.push(creature(16, "{2}{R}", 3.0));
        let catalog: CardCatalog = cards.into_iter().collect();

        let picks: Vec<ArenaId> = (1..=16).collect();
        let result = classify_pool(&picks, &catalog).unwrap();

        assert_eq!(result.dominant_colors, vec![Color::Red, Color::Green]);
        assert_eq!(result.color_pair.map(|p| p.name), Some("Gruul"));
        assert_eq!(result.play_style, Some(PlayStyle::Aggro));
        assert_eq!(result.archetype, "Gruul Aggro");
        assert_eq!(result.color_identity, "RG");
        assert_eq!(result.signature_cards, vec![15]);
        // 0.5 pair + 0.2 style + 0.05 for one indicator
        assert!(approx_eq(result.confidence, 0.75, 1e-9));
        assert_eq!(result.total_cards, 16);
    }

    #[test]
    fn classify_mono_and_multicolor_pools() {
        let mono: CardCatalog = (1..=5).map(|id| creature(id, "{3}{B}", 4.0)).collect();
        let result = classify_pool(&[1, 2, 3, 4, 5], &mono).unwrap();
        assert_eq!(result.archetype, "Mono-Black");
        assert_eq!(result.play_style, None);
        assert!(approx_eq(result.confidence, 0.5, 1e-9));

        let wide: CardCatalog = vec![
            creature(1, "{3}{W}", 4.0),
            creature(2, "{3}{U}", 4.0),
            creature(3, "{3}{B}", 4.0),
        ]
        .into_iter()
        .collect();
        let result = classify_pool(&[1, 2, 3], &wide).unwrap();
        assert_eq!(result.archetype, "Multi-color");
        assert!(approx_eq(result.confidence, 0.4, 1e-9));
    }

    #[test]
    fn colorless_pool_is_unknown_or_just_a_style() {
        let catalog: CardCatalog = (1..=4)
            .map(|id| {
                CardMetadata::new(id, format!("Construct {id}"), "Artifact Creature — Construct", 3.0)
                    .with_power_toughness("3", "3")
            })
            .collect();
        let result = classify_pool(&[1, 2, 3, 4], &catalog).unwrap();
        assert_eq!(result.color_identity, "C");
        assert_eq!(result.archetype, "Midrange");
        assert!(approx_eq(result.confidence, 0.35, 1e-9));

        let lands: CardCatalog = vec![CardMetadata::new(9, "Wastes", "Basic Land", 0.0)]
            .into_iter()
            .collect();
        let result = classify_pool(&[9], &lands).unwrap();
        assert_eq!(result.archetype, "Unknown");
        assert!(approx_eq(result.confidence, 0.2, 1e-9));
    }

    #[test]
    fn indicator_boost_is_limited() {
        let text = "Whenever you sacrifice a permanent, put a +1/+1 counter on each creature you control. \
                    Whenever you cast an instant or sorcery, return a card from your graveyard.";
        let mut cards: Vec<CardMetadata> = (1..=6)
            .map(|id| creature(id, "{W}", 1.0).with_oracle_text(text))
            .collect();
        cards.extend((7..=10).map(|id| creature(id, "{1}{U}", 2.0)));
        let catalog: CardCatalog = cards.into_iter().collect();
        let picks: Vec<ArenaId> = (1..=10).collect();
        let result = classify_pool(&picks, &catalog).unwrap();
        assert_eq!(result.archetype, "Azorius Aggro");
        // 24 indicators, but the boost stops at 0.2
        assert_eq!(result.indicators.len(), 24);
        assert!(approx_eq(result.confidence, 0.9, 1e-9));
    }

    #[test]
    fn repeated_picks_count_every_copy() {
        let catalog: CardCatalog = vec![creature(1, "{R}", 1.0), creature(2, "{G}", 1.0)]
            .into_iter()
            .collect();
        let result = classify_pool(&[1, 1, 1, 2], &catalog).unwrap();
        assert_eq!(result.total_cards, 4);
        assert_eq!(result.composition.color_counts[&Color::Red], 3);
    }

    #[test]
    fn deck_classification_ignores_the_sideboard() {
        let catalog: CardCatalog = vec![creature(1, "{R}", 1.0), creature(2, "{U}", 1.0)]
            .into_iter()
            .collect();
        let deck = vec![DeckCard::main(1, 4), DeckCard::sideboard(2, 4)];
        let result = classify_deck(&deck, &catalog).unwrap();
        assert_eq!(result.dominant_colors, vec![Color::Red]);
        assert_eq!(result.total_cards, 4);
    }

    #[test]
    fn nothing_to_classify() {
        let catalog = CardCatalog::new();
        assert!(classify_pool(&[], &catalog).is_none());
        assert!(classify_deck(&[DeckCard::sideboard(1, 2)], &catalog).is_none());
    }
}
