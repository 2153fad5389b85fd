// Command-line interface definition.

use clap::{ArgGroup, Parser, Subcommand};
use pickwise_core::deck::DeckFormat;
use pickwise_core::ArenaId;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "pickwise",
    version,
    about = "Draft pick recommendations, draft grades and deck analytics for MTG Arena"
)]
pub struct Cli {
    /// Directory holding defaults/, config/ and logs/.
    #[arg(long, env = "PICKWISE_HOME", default_value = ".", global = true)]
    pub home: PathBuf,

    /// Override the configured set code for rating lookups.
    #[arg(long, global = true)]
    pub set_code: Option<String>,

    /// Override the configured draft format for rating lookups.
    #[arg(long, global = true)]
    pub draft_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Score every card in a pack and recommend a pick.
    Recommend {
        /// Arena ids of the cards in the pack.
        #[arg(long, value_delimiter = ',', required = true)]
        pack: Vec<ArenaId>,
        /// Arena ids already picked this draft.
        #[arg(long, value_delimiter = ',')]
        picks: Vec<ArenaId>,
        /// 0-indexed pack number.
        #[arg(long, default_value_t = 0)]
        pack_number: u32,
        /// 0-indexed pick number.
        #[arg(long, default_value_t = 0)]
        pick_number: u32,
    },

    /// Grade a single pick against the pack it came from.
    GradePick {
        #[arg(long, value_delimiter = ',', required = true)]
        pack: Vec<ArenaId>,
        #[arg(long)]
        picked: ArenaId,
    },

    /// Grade every pick of a recorded draft and the draft as a whole.
    GradeDraft {
        /// Session JSON with `picks` and `packs`.
        #[arg(long)]
        session: PathBuf,
    },

    /// Show which cards other drafters took from each pack.
    Signals {
        #[arg(long)]
        session: PathBuf,
        /// Limit to one pack (requires --pick-number).
        #[arg(long, requires = "pick_number")]
        pack_number: Option<u32>,
        #[arg(long, requires = "pack_number")]
        pick_number: Option<u32>,
    },

    /// Classify the archetype of a draft pool or a deck.
    #[command(group(ArgGroup::new("source").required(true).args(["session", "deck"])))]
    Archetype {
        /// Session JSON whose picks form the pool.
        #[arg(long)]
        session: Option<PathBuf>,
        /// Decklist file; the mainboard is classified.
        #[arg(long)]
        deck: Option<PathBuf>,
    },

    /// Deck statistics and format legality for a decklist.
    DeckStats {
        /// Decklist file: `<quantity> <arena id>` per line.
        #[arg(long)]
        deck: PathBuf,
        /// Format the deck was built for (standard, historic, brawl, limited, ...).
        #[arg(long, default_value = "standard")]
        format: DeckFormat,
    },

    /// Cards and wildcards needed to finish a deck or a set.
    #[command(group(ArgGroup::new("target").required(true).args(["deck", "set"])))]
    Missing {
        #[arg(long)]
        deck: Option<PathBuf>,
        #[arg(long)]
        set: Option<String>,
    },
}

impl Command {
    /// Name used in the report envelope.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Recommend { .. } => "recommend",
            Command::GradePick { .. } => "grade-pick",
            Command::GradeDraft { .. } => "grade-draft",
            Command::Signals { .. } => "signals",
            Command::Archetype { .. } => "archetype",
            Command::DeckStats { .. } => "deck-stats",
            Command::Missing { .. } => "missing",
        }
    }
}

impl Cli {
    /// Apply command-line scope overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(set_code) = &self.set_code {
            config.draft.set_code = set_code.clone();
        }
        if let Some(format) = &self.draft_format {
            config.draft.format = format.clone();
        }
    }
}
