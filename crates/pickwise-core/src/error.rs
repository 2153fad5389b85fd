// Error types for turning upstream strings into typed values.

use thiserror::Error;

/// Failure to turn a free-form upstream string into one of the engine's
/// closed enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown color symbol `{0}`")]
    UnknownColor(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unknown board `{0}` (expected main or sideboard)")]
    UnknownBoard(String),
}
