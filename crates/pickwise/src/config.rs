// Configuration loading and parsing (pickwise.toml).

use pickwise_core::deck::FormatRules;
use pickwise_core::draft::{GradeWeights, ScoringWeights};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to write default config {path}: {source}")]
    DefaultsCopyError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub scoring: ScoringWeights,
    pub grading: GradeWeights,
    pub formats: FormatRules,
    pub collection: CollectionConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// pickwise.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire pickwise.toml file. The engine
/// sections fall back to the engine's own defaults when omitted.
#[derive(Debug, Clone, Deserialize)]
struct PickwiseFile {
    draft: DraftConfig,
    #[serde(default)]
    scoring: ScoringWeights,
    #[serde(default)]
    grading: GradeWeights,
    #[serde(default)]
    formats: FormatRules,
    #[serde(default)]
    collection: CollectionConfig,
    data: DataPaths,
}

/// The (set, format) scope ratings are looked up under.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    pub set_code: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Copies of each card a complete set collection holds.
    pub set_copies_cap: u32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        CollectionConfig { set_copies_cap: 4 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub ratings: String,
    pub cards: String,
    pub collection: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/pickwise.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("pickwise.toml");
    let text = read_file(&path)?;
    let file: PickwiseFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        draft: file.draft,
        scoring: file.scoring,
        grading: file.grading,
        formats: file.formats,
        collection: file.collection,
        data_paths: file.data,
    };

    validate(&config)?;

    Ok(config)
}

/// Defaults compiled into the binary, used when `defaults/` is absent.
const BUILTIN_DEFAULTS: &str = include_str!("../defaults/pickwise.toml");

/// Write `config/pickwise.toml` on first run. The template is
/// `defaults/pickwise.toml` when the base dir ships one, otherwise the
/// built-in defaults. Returns the path written, or `None` when a config
/// already exists.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join("pickwise.toml");
    if target.exists() {
        return Ok(None);
    }

    let shipped = base_dir.join("defaults").join("pickwise.toml");
    let template = if shipped.is_file() {
        std::fs::read_to_string(&shipped).map_err(|e| ConfigError::DefaultsCopyError {
            path: shipped.clone(),
            source: e,
        })?
    } else {
        BUILTIN_DEFAULTS.to_string()
    };

    let write_err = |e| ConfigError::DefaultsCopyError {
        path: target.clone(),
        source: e,
    };
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    // create_new so a config written concurrently is never clobbered
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut file) => {
            std::io::Write::write_all(&mut file, template.as_bytes()).map_err(write_err)?;
            Ok(Some(target.clone()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(write_err(e)),
    }
}

/// Loads config relative to `base_dir`, writing the default config first if
/// there is none.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.set_code.trim().is_empty() {
        return Err(invalid("draft.set_code", "must not be empty"));
    }
    if config.draft.format.trim().is_empty() {
        return Err(invalid("draft.format", "must not be empty"));
    }

    // Scoring weights must all be positive
    let s = &config.scoring;
    let weight_fields: &[(&str, f64)] = &[
        ("scoring.quality_weight", s.quality_weight),
        ("scoring.early_color_weight", s.early_color_weight),
        ("scoring.established_color_weight", s.established_color_weight),
        ("scoring.availability_weight", s.availability_weight),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val <= 0.0 {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }

    if !(s.win_rate_ceiling > s.win_rate_floor) {
        return Err(invalid(
            "scoring.win_rate_ceiling",
            format!(
                "must be greater than win_rate_floor ({}), got {}",
                s.win_rate_floor, s.win_rate_ceiling
            ),
        ));
    }
    if !(s.alsa_worst > s.alsa_best) {
        return Err(invalid(
            "scoring.alsa_worst",
            format!(
                "must be greater than alsa_best ({}), got {}",
                s.alsa_best, s.alsa_worst
            ),
        ));
    }

    let g = &config.grading;
    let grade_fields: &[(&str, f64)] = &[
        ("grading.pick_quality_weight", g.pick_quality_weight),
        ("grading.color_discipline_weight", g.color_discipline_weight),
        ("grading.deck_composition_weight", g.deck_composition_weight),
        ("grading.strategic_weight", g.strategic_weight),
    ];
    for (name, val) in grade_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(invalid(name, format!("must be >= 0, got {val}")));
        }
    }
    if g.total() <= 0.0 {
        return Err(invalid("grading", "weights must not sum to zero"));
    }

    if config.formats.max_copies == 0 {
        return Err(invalid("formats.max_copies", "must be > 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
