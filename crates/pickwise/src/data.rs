// Local data loading: ratings, card catalog, collection, decklists and
// draft session logs.
//
// Ratings come from a 17Lands card-ratings export (CSV), the catalog from a
// JSON array of card objects, the collection from an `arena_id,quantity` CSV.
// Malformed rows are skipped with a warning rather than failing the load.

use pickwise_core::deck::{Board, DeckCard};
use pickwise_core::draft::{Pack, RecordedPick};
use pickwise_core::{ArenaId, CardCatalog, CardMetadata, CardRating, ColorSet, Rarity, RatingTable};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A recorded draft: every pick made and every pack seen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftSession {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub picks: Vec<RecordedPick>,
    #[serde(default)]
    pub packs: Vec<Pack>,
}

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

/// 17Lands card-ratings row. Numeric columns are read as text because the
/// export leaves them blank for cards without enough games.
#[derive(Debug, Deserialize)]
struct RawRating {
    mtga_id: ArenaId,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Color", default)]
    color: String,
    #[serde(rename = "Rarity", default)]
    rarity: String,
    #[serde(rename = "ALSA", default)]
    alsa: String,
    #[serde(rename = "GIH WR", default)]
    gih_wr: String,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    arena_id: ArenaId,
    name: String,
    #[serde(default, alias = "set_code")]
    set: String,
    #[serde(default)]
    type_line: String,
    #[serde(default)]
    mana_cost: Option<String>,
    #[serde(default)]
    cmc: f64,
    /// When present, even empty, this overrides colors derived from the
    /// mana cost.
    #[serde(default)]
    colors: Option<Vec<String>>,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    power: Option<String>,
    #[serde(default)]
    toughness: Option<String>,
    #[serde(default)]
    oracle_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOwned {
    arena_id: ArenaId,
    quantity: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a GIH WR cell into a fraction. Accepts `58.3%`, `58.3` and `0.583`.
pub fn parse_win_rate(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    };
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let fraction = if is_percent || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    (0.0..=1.0).contains(&fraction).then_some(fraction)
}

/// Resolve a configured data path against the base directory. Absolute
/// paths are returned unchanged.
pub fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    base_dir.join(path)
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_text(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_ratings_from_reader<R: Read>(
    rdr: R,
    set_code: &str,
    format: &str,
) -> Result<RatingTable, csv::Error> {
    let mut reader = csv_reader(rdr);
    let mut table = RatingTable::new();
    for result in reader.deserialize::<RawRating>() {
        match result {
            Ok(raw) => {
                let Some(win_rate) = parse_win_rate(&raw.gih_wr) else {
                    debug!("skipping rating for '{}': no usable GIH WR", raw.name);
                    continue;
                };
                let alsa = match raw.alsa.parse::<f64>() {
                    Ok(v) if v.is_finite() => v,
                    _ => {
                        warn!("skipping rating for '{}': bad ALSA '{}'", raw.name, raw.alsa);
                        continue;
                    }
                };
                table.insert(
                    set_code,
                    format,
                    CardRating {
                        arena_id: raw.mtga_id,
                        name: raw.name,
                        rarity: Rarity::parse(&raw.rarity),
                        colors: ColorSet::parse(&raw.color),
                        win_rate_in_hand: win_rate,
                        avg_last_seen_at: alsa,
                    },
                );
            }
            Err(e) => {
                warn!("skipping malformed rating row: {}", e);
            }
        }
    }
    Ok(table)
}

fn card_from_raw(raw: RawCard) -> CardMetadata {
    let mut card = CardMetadata::new(raw.arena_id, raw.name, raw.type_line, raw.cmc).with_set(raw.set);
    if let Some(rarity) = raw.rarity {
        card = card.with_rarity(Rarity::parse(&rarity));
    }
    if let Some(cost) = raw.mana_cost {
        card = card.with_mana_cost(cost);
    }
    if let Some(colors) = raw.colors {
        card = card.with_colors(ColorSet::parse(&colors.join(",")));
    }
    if let (Some(power), Some(toughness)) = (raw.power, raw.toughness) {
        card = card.with_power_toughness(power, toughness);
    }
    if let Some(text) = raw.oracle_text {
        card = card.with_oracle_text(text);
    }
    card
}

fn load_cards_from_str(text: &str) -> Result<CardCatalog, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let mut catalog = CardCatalog::new();
    for entry in entries {
        match serde_json::from_value::<RawCard>(entry) {
            Ok(raw) => {
                if !raw.cmc.is_finite() {
                    warn!("skipping card '{}': non-finite cmc", raw.name);
                    continue;
                }
                catalog.insert(card_from_raw(raw));
            }
            Err(e) => {
                warn!("skipping malformed card entry: {}", e);
            }
        }
    }
    Ok(catalog)
}

fn load_collection_from_reader<R: Read>(rdr: R) -> Result<HashMap<ArenaId, u32>, csv::Error> {
    let mut reader = csv_reader(rdr);
    let mut owned = HashMap::new();
    for result in reader.deserialize::<RawOwned>() {
        match result {
            Ok(raw) => {
                if owned.insert(raw.arena_id, raw.quantity).is_some() {
                    warn!("duplicate collection entry for {}, using latest value", raw.arena_id);
                }
            }
            Err(e) => {
                warn!("skipping malformed collection row: {}", e);
            }
        }
    }
    Ok(owned)
}

/// Parse a decklist: one `<quantity> <arena id>` per line. A `Sideboard`
/// line moves the following cards to the sideboard and a `Deck` line moves
/// them back. Blank lines and `#` comments are ignored.
pub fn parse_decklist(text: &str) -> Vec<DeckCard> {
    let mut board = Board::Main;
    let mut cards = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(section) = line.trim_end_matches(':').parse::<Board>() {
            board = section;
            continue;
        }

        let mut parts = line.split_whitespace();
        let quantity = parts
            .next()
            .map(|q| q.trim_end_matches(['x', 'X']))
            .and_then(|q| q.parse::<u32>().ok());
        let card_id = parts.next().and_then(|id| id.parse::<ArenaId>().ok());
        match (quantity, card_id) {
            (Some(0), Some(_)) => {}
            (Some(quantity), Some(card_id)) => cards.push(DeckCard {
                card_id,
                quantity,
                board,
            }),
            _ => warn!("skipping malformed decklist line {}: '{}'", index + 1, line),
        }
    }
    cards
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load a 17Lands ratings export into a table scoped to (set, format).
pub fn load_ratings(path: &Path, set_code: &str, format: &str) -> Result<RatingTable, DataError> {
    let file = open(path)?;
    let table = load_ratings_from_reader(file, set_code, format).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if table.is_empty() {
        return Err(DataError::Validation(format!(
            "ratings file {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(table)
}

/// Load the card catalog from a JSON array of card objects.
pub fn load_cards(path: &Path) -> Result<CardCatalog, DataError> {
    let text = read_text(path)?;
    load_cards_from_str(&text).map_err(|e| DataError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load owned quantities. A missing collection file means nothing is owned.
pub fn load_collection(path: &Path) -> Result<HashMap<ArenaId, u32>, DataError> {
    if !path.exists() {
        warn!("collection file {} not found, treating collection as empty", path.display());
        return Ok(HashMap::new());
    }
    let file = open(path)?;
    load_collection_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_decklist(path: &Path) -> Result<Vec<DeckCard>, DataError> {
    let cards = parse_decklist(&read_text(path)?);
    if cards.is_empty() {
        return Err(DataError::Validation(format!(
            "decklist {} contains no cards",
            path.display()
        )));
    }
    Ok(cards)
}

pub fn load_session(path: &Path) -> Result<DraftSession, DataError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| DataError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pickwise_core::{CardMetadataLookup, RatingLookup};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn win_rate_accepts_percent_and_fraction_forms() {
        assert!(approx_eq(parse_win_rate("58.3%").unwrap(), 0.583));
        assert!(approx_eq(parse_win_rate("58.3").unwrap(), 0.583));
        assert!(approx_eq(parse_win_rate("0.583").unwrap(), 0.583));
        assert!(approx_eq(parse_win_rate(" 61 % ").unwrap(), 0.61));
    }

    #[test]
    fn win_rate_rejects_blank_and_out_of_range() {
        assert_eq!(parse_win_rate(""), None);
        assert_eq!(parse_win_rate("n/a"), None);
        assert_eq!(parse_win_rate("NaN"), None);
        assert_eq!(parse_win_rate("150%"), None);
        assert_eq!(parse_win_rate("-5"), None);
    }

    #[test]
    fn ratings_reader_parses_17lands_export() {
        let csv = "\
mtga_id,Name,Color,Rarity,ALSA,GIH WR,# GIH
1001,Lightning Strike,R,common,2.31,58.3%,12000
1002,Azorius Guard,WU,uncommon,5.5,0.541,9000
";
        let table = load_ratings_from_reader(csv.as_bytes(), "TST", "PremierDraft").unwrap();
        assert_eq!(table.len_for("TST", "PremierDraft"), 2);

        let strike = table.get_rating("TST", "PremierDraft", 1001).unwrap();
        assert_eq!(strike.name, "Lightning Strike");
        assert_eq!(strike.rarity, Rarity::Common);
        assert_eq!(strike.colors, ColorSet::parse("R"));
        assert!(approx_eq(strike.win_rate_in_hand, 0.583));
        assert!(approx_eq(strike.avg_last_seen_at, 2.31));

        let guard = table.get_rating("TST", "PremierDraft", 1002).unwrap();
        assert_eq!(guard.colors.len(), 2);
        assert!(table.get_rating("TST", "QuickDraft", 1001).is_none());
    }

    #[test]
    fn ratings_reader_skips_blank_and_malformed_rows() {
        let csv = "\
mtga_id,Name,Color,Rarity,ALSA,GIH WR
1001,Good,R,rare,3.0,60%
1002,Few Games,G,rare,4.0,
abc,Broken,U,common,1.0,50%
1003,Bad Alsa,B,common,oops,55%
";
        let table = load_ratings_from_reader(csv.as_bytes(), "TST", "PremierDraft").unwrap();
        assert_eq!(table.len_for("TST", "PremierDraft"), 1);
        assert!(table.get_rating("TST", "PremierDraft", 1001).is_some());
    }

    #[test]
    fn card_json_builds_typed_metadata() {
        let json = r#"[
            {"arena_id": 1, "name": "Goblin Guide", "set": "TST", "type_line": "Creature — Goblin",
             "mana_cost": "{R}", "cmc": 1, "rarity": "rare", "power": "2", "toughness": "2",
             "oracle_text": "Haste"},
            {"arena_id": 2, "name": "Plains", "set": "TST", "type_line": "Basic Land — Plains",
             "cmc": 0, "rarity": "basic"},
            {"arena_id": 3, "name": "Hybrid", "type_line": "Instant", "cmc": 2, "mana_cost": "{W/U}{W/U}"}
        ]"#;
        let catalog = load_cards_from_str(json).unwrap();
        assert_eq!(catalog.len(), 3);

        let guide = catalog.get_card(1).unwrap();
        assert!(guide.is_creature);
        assert_eq!(guide.colors, ColorSet::parse("R"));
        assert_eq!(guide.rarity, Rarity::Rare);
        assert_eq!(guide.power.as_deref(), Some("2"));
        assert_eq!(guide.oracle_text.as_deref(), Some("Haste"));

        assert!(catalog.get_card(2).unwrap().is_printed_basic_land());
        assert_eq!(catalog.get_card(3).unwrap().colors, ColorSet::parse("WU"));
    }

    #[test]
    fn explicit_colors_win_over_mana_cost() {
        let json = r#"[{"arena_id": 9, "name": "Devoid Thing", "type_line": "Creature",
                         "mana_cost": "{2}{B}", "colors": [], "cmc": 3}]"#;
        let catalog = load_cards_from_str(json).unwrap();
        assert!(catalog.get_card(9).unwrap().colors.is_empty());

        let json = r#"[{"arena_id": 9, "name": "Plain", "type_line": "Creature",
                         "mana_cost": "{2}{B}", "cmc": 3}]"#;
        let catalog = load_cards_from_str(json).unwrap();
        assert_eq!(catalog.get_card(9).unwrap().colors, ColorSet::parse("B"));

        let json = r#"[{"arena_id": 9, "name": "Painted", "type_line": "Creature",
                         "mana_cost": "{2}{B}", "colors": ["G"], "cmc": 3}]"#;
        let catalog = load_cards_from_str(json).unwrap();
        assert_eq!(catalog.get_card(9).unwrap().colors, ColorSet::parse("G"));
    }

    #[test]
    fn card_json_accepts_full_color_words() {
        let json = r#"[{"arena_id": 5, "name": "Frost Owl", "type_line": "Creature — Bird",
                         "colors": ["Blue", "White"], "cmc": 2}]"#;
        let catalog = load_cards_from_str(json).unwrap();
        assert_eq!(catalog.get_card(5).unwrap().colors.to_string(), "WU");
    }

    #[test]
    fn card_json_skips_malformed_entries() {
        let json = r#"[{"arena_id": "x", "name": 5}, {"arena_id": 4, "name": "Ok", "type_line": "Sorcery", "cmc": 1}]"#;
        let catalog = load_cards_from_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get_card(4).is_some());
    }

    #[test]
    fn card_json_that_is_not_an_array_is_an_error() {
        assert!(load_cards_from_str("{\"arena_id\": 1}").is_err());
    }

    #[test]
    fn collection_reader_uses_latest_duplicate() {
        let csv = "arena_id,quantity\n1,2\n2,4\nbad,1\n1,3\n";
        let owned = load_collection_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[&1], 3);
        assert_eq!(owned[&2], 4);
    }

    #[test]
    fn missing_collection_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let owned = load_collection(&tmp.path().join("nope.csv")).unwrap();
        assert!(owned.is_empty());
    }

    #[test]
    fn decklist_switches_boards_and_ignores_comments() {
        let text = "\
# my deck
Deck
4 1001
2x 1002  # flex slot

Sideboard:
1 1003
garbage line
0 1004
";
        let cards = parse_decklist(text);
        assert_eq!(
            cards,
            vec![
                DeckCard::main(1001, 4),
                DeckCard::main(1002, 2),
                DeckCard::sideboard(1003, 1),
            ]
        );
    }

    #[test]
    fn empty_decklist_file_is_a_validation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("deck.txt");
        std::fs::write(&path, "# nothing here\n").unwrap();
        assert!(matches!(load_decklist(&path), Err(DataError::Validation(_))));
    }

    #[test]
    fn session_json_parses_picks_and_packs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"session_id": "abc",
                "picks": [{"pack_number": 0, "pick_number": 0, "card_id": 7}],
                "packs": [{"pack_number": 0, "pick_number": 0, "card_ids": [7, 8]}]}"#,
        )
        .unwrap();
        let session = load_session(&path).unwrap();
        assert_eq!(session.session_id.as_deref(), Some("abc"));
        assert_eq!(session.picks.len(), 1);
        assert_eq!(session.packs[0].card_ids, vec![7, 8]);
    }

    #[test]
    fn missing_ratings_file_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_ratings(&tmp.path().join("r.csv"), "TST", "PremierDraft"),
            Err(DataError::Io { .. })
        ));
    }
}
