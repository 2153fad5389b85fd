// Win-rate tiers.
//
// A card's tier is a coarse bucket of its games-in-hand win rate, used for
// quick "is this good?" labels and for counting bombs.

use serde::{Deserialize, Serialize};

/// Tier bucket, ordered from worst (`F`) to best (`S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    F,
    D,
    C,
    B,
    A,
    S,
}

impl Tier {
    /// Classify a win rate given as a percentage (58.3, not 0.583).
    ///
    /// Boundaries are inclusive on the lower edge: 60.0 is S, 59.99 is A.
    /// NaN lands in F.
    pub fn classify(win_rate_percent: f64) -> Self {
        match win_rate_percent {
            x if x >= 60.0 => Tier::S,
            x if x >= 57.0 => Tier::A,
            x if x >= 54.0 => Tier::B,
            x if x >= 51.0 => Tier::C,
            x if x >= 48.0 => Tier::D,
            _ => Tier::F,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::F => "F",
        }
    }
}
