// Card model: colors, rarity, type classification and per-card data.
//
// Upstream sources hand us free-form strings (type lines, rarity names, mana
// costs). They are parsed once, at ingestion, into the closed enums below so
// the analyzers can match on them instead of re-scanning text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::tier::Tier;

/// MTG Arena card identifier (`grpId` / 17Lands `mtga_id`).
pub type ArenaId = u32;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// One of the five colors of Magic, in WUBRG order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    /// All colors in WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Parse a single color symbol. Only the uppercase WUBRG letters are
    /// accepted, so words like "Green" are not mistaken for symbols.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    /// Parse a full color word, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "white" => Some(Color::White),
            "blue" => Some(Color::Blue),
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Color::from_symbol(c.to_ascii_uppercase()).ok_or_else(|| ParseError::UnknownColor(s.to_string()))
            }
            _ => Err(ParseError::UnknownColor(s.to_string())),
        }
    }
}

/// A set of colors. Iteration and display always follow WUBRG order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);

    pub fn new() -> Self {
        ColorSet::EMPTY
    }

    /// Collect the colors named in `text`.
    ///
    /// Works for plain color strings ("WU"), mana costs ("{2}{W}{U}"),
    /// hybrid symbols ("{W/U}" yields both), separated lists ("R,G") and
    /// full color words ("Blue", "green"). A run of letters counts only if
    /// it is a color word or made entirely of WUBRG symbols, so other words
    /// contribute nothing.
    pub fn parse(text: &str) -> Self {
        let mut set = ColorSet::new();
        for token in text.split(|c: char| !c.is_ascii_alphabetic()) {
            if let Some(color) = Color::from_name(token) {
                set.insert(color);
            } else if let Some(symbols) = token
                .chars()
                .map(Color::from_symbol)
                .collect::<Option<Vec<Color>>>()
            {
                for color in symbols {
                    set.insert(color);
                }
            }
        }
        set
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every color of `self` is also in `other`.
    pub fn is_subset(&self, other: &ColorSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Number of colors shared with `other`.
    pub fn overlap(&self, other: &ColorSet) -> usize {
        (self.0 & other.0).count_ones() as usize
    }

    /// The only color in the set, if it is mono-colored.
    pub fn single(&self) -> Option<Color> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::new();
        for color in iter {
            set.insert(color);
        }
        set
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.iter() {
            write!(f, "{}", color.symbol())?;
        }
        Ok(())
    }
}

impl Serialize for ColorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(ColorSet::parse(&text))
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Card rarity, parsed case-insensitively from upstream rarity strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
    /// Bonus-sheet / special rarities. Never crafted with a wildcard.
    Special,
    /// Basic lands, which are free and unlimited on Arena.
    Basic,
    Unknown,
}

impl Rarity {
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        match lower.as_str() {
            "common" | "c" => Rarity::Common,
            "uncommon" | "u" => Rarity::Uncommon,
            "rare" | "r" => Rarity::Rare,
            "mythic" | "mythic rare" | "m" => Rarity::Mythic,
            "special" | "bonus" | "timeshifted" | "s" => Rarity::Special,
            other if other.contains("basic") => Rarity::Basic,
            _ => Rarity::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
            Rarity::Special => "special",
            Rarity::Basic => "basic",
            Rarity::Unknown => "unknown",
        }
    }

    /// Sort key for "most expensive first" listings: mythic highest, anything
    /// that is not a wildcard rarity lowest.
    pub fn display_priority(&self) -> u8 {
        match self {
            Rarity::Mythic => 4,
            Rarity::Rare => 3,
            Rarity::Uncommon => 2,
            Rarity::Common => 1,
            Rarity::Special | Rarity::Basic | Rarity::Unknown => 0,
        }
    }
}

impl From<String> for Rarity {
    fn from(value: String) -> Self {
        Rarity::parse(&value)
    }
}

impl From<Rarity> for String {
    fn from(value: Rarity) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Card type
// ---------------------------------------------------------------------------

/// Primary card type used for deck breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Land,
    Creature,
    Planeswalker,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Other,
}

impl CardType {
    /// Classify a type line. Earlier arms win, so "Artifact Creature" is a
    /// creature and "Artifact Land" is a land.
    pub fn from_type_line(type_line: &str) -> Self {
        let lower = type_line.to_lowercase();
        match () {
            _ if lower.contains("land") => CardType::Land,
            _ if lower.contains("creature") => CardType::Creature,
            _ if lower.contains("planeswalker") => CardType::Planeswalker,
            _ if lower.contains("instant") => CardType::Instant,
            _ if lower.contains("sorcery") => CardType::Sorcery,
            _ if lower.contains("enchantment") => CardType::Enchantment,
            _ if lower.contains("artifact") => CardType::Artifact,
            _ => CardType::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Card metadata
// ---------------------------------------------------------------------------

/// Static card data as returned by a card metadata source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMetadata {
    pub arena_id: ArenaId,
    pub name: String,
    pub set_code: String,
    pub type_line: String,
    /// Derived from `type_line` when the card is built.
    pub card_type: CardType,
    /// Whether the type line mentions "creature" anywhere, independent of
    /// the primary type (land creatures still count for power/toughness).
    pub is_creature: bool,
    pub mana_cost: Option<String>,
    pub cmc: f64,
    pub colors: ColorSet,
    pub rarity: Rarity,
    pub power: Option<String>,
    pub toughness: Option<String>,
    /// Rules text, when the source provides it.
    pub oracle_text: Option<String>,
}

impl CardMetadata {
    pub fn new(
        arena_id: ArenaId,
        name: impl Into<String>,
        type_line: impl Into<String>,
        cmc: f64,
    ) -> Self {
        let type_line = type_line.into();
        let card_type = CardType::from_type_line(&type_line);
        let is_creature = type_line.to_lowercase().contains("creature");
        CardMetadata {
            arena_id,
            name: name.into(),
            set_code: String::new(),
            type_line,
            card_type,
            is_creature,
            mana_cost: None,
            cmc,
            colors: ColorSet::EMPTY,
            rarity: Rarity::Unknown,
            power: None,
            toughness: None,
            oracle_text: None,
        }
    }

    pub fn with_set(mut self, set_code: impl Into<String>) -> Self {
        self.set_code = set_code.into();
        self
    }

    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set the mana cost. When no explicit colors were given, they are
    /// derived from the cost symbols.
    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>) -> Self {
        let mana_cost = mana_cost.into();
        if self.colors.is_empty() {
            self.colors = ColorSet::parse(&mana_cost);
        }
        self.mana_cost = Some(mana_cost);
        self
    }

    pub fn with_power_toughness(
        mut self,
        power: impl Into<String>,
        toughness: impl Into<String>,
    ) -> Self {
        self.power = Some(power.into());
        self.toughness = Some(toughness.into());
        self
    }

    pub fn with_oracle_text(mut self, oracle_text: impl Into<String>) -> Self {
        self.oracle_text = Some(oracle_text.into());
        self
    }

    pub fn is_land(&self) -> bool {
        self.card_type == CardType::Land
    }

    /// True for cards printed as basic lands (rarity or "Basic ... Land" type).
    pub fn is_printed_basic_land(&self) -> bool {
        self.rarity == Rarity::Basic
            || (self.type_line.contains("Basic") && self.type_line.contains("Land"))
    }
}

/// Parse a printed power or toughness value.
///
/// `*`, empty strings and anything without a leading integer count as 0;
/// values like `1+*` keep their leading integer.
pub fn parse_power_toughness(value: &str) -> i64 {
    let trimmed = value.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Win-rate and pick-order statistics for one card in one (set, format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRating {
    pub arena_id: ArenaId,
    pub name: String,
    pub rarity: Rarity,
    pub colors: ColorSet,
    /// Games-in-hand win rate as a fraction in [0, 1].
    pub win_rate_in_hand: f64,
    /// Average pick position at which the card was last seen (1 = first pick).
    pub avg_last_seen_at: f64,
}

impl CardRating {
    /// GIHWR as a percentage, the unit tiers are expressed in.
    pub fn win_rate_percent(&self) -> f64 {
        self.win_rate_in_hand * 100.0
    }

    pub fn tier(&self) -> Tier {
        Tier::classify(self.win_rate_percent())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
