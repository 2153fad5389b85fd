// Command dispatch: load the data a command needs, build its report and
// render it as JSON.

use anyhow::Context;
use pickwise_core::draft::Pack;
use std::path::Path;
use tracing::info;

use crate::cli::Command;
use crate::config::Config;
use crate::data;
use crate::report::{self, ArchetypeSource, CompletionTarget, Report};

/// Run one command and return its JSON report.
pub fn run(command: &Command, config: &Config, base_dir: &Path) -> anyhow::Result<String> {
    let name = command.name();
    info!(
        "Running {} for {}/{}",
        name, config.draft.set_code, config.draft.format
    );

    let json = match command {
        Command::Recommend {
            pack,
            picks,
            pack_number,
            pick_number,
        } => {
            let ratings = load_ratings(config, base_dir)?;
            let pack = Pack::new(*pack_number, *pick_number, pack.clone());
            let result = report::recommend_report(config, &ratings, &pack, picks);
            Report::new(name, result).to_json()
        }
        Command::GradePick { pack, picked } => {
            let ratings = load_ratings(config, base_dir)?;
            let result = report::grade_pick_report(config, &ratings, pack, *picked);
            Report::new(name, result).to_json()
        }
        Command::GradeDraft { session } => {
            let ratings = load_ratings(config, base_dir)?;
            let session = data::load_session(session).context("failed to load draft session")?;
            info!(
                "Session loaded: {} picks, {} packs",
                session.picks.len(),
                session.packs.len()
            );
            let result = report::draft_report(config, &ratings, &session);
            info!("Draft graded {}", result.review.grade.overall_grade.label());
            Report::new(name, result).to_json()
        }
        Command::Signals {
            session,
            pack_number,
            pick_number,
        } => {
            let ratings = load_ratings(config, base_dir)?;
            let session = data::load_session(session).context("failed to load draft session")?;
            let coordinates = pack_number.zip(*pick_number);
            let result = report::signals_report(config, &ratings, &session, coordinates);
            Report::new(name, result).to_json()
        }
        Command::Archetype { session, deck } => {
            let catalog = load_catalog(config, base_dir)?;
            let source = match (session, deck) {
                (Some(session), _) => {
                    let session =
                        data::load_session(session).context("failed to load draft session")?;
                    ArchetypeSource::Pool(session.picks.iter().map(|p| p.card_id).collect())
                }
                (None, Some(deck)) => ArchetypeSource::Deck(
                    data::load_decklist(deck).context("failed to load decklist")?,
                ),
                (None, None) => anyhow::bail!("archetype needs --session or --deck"),
            };
            let result = report::archetype_report(&catalog, &source);
            match &result.classification {
                Some(c) => info!("Classified {} as {} ({:.2})", result.source, c.archetype, c.confidence),
                None => info!("Nothing to classify in {}", result.source),
            }
            Report::new(name, result).to_json()
        }
        Command::DeckStats { deck, format } => {
            let catalog = load_catalog(config, base_dir)?;
            let cards = data::load_decklist(deck).context("failed to load decklist")?;
            let result = report::deck_report(config, &catalog, &cards, *format);
            Report::new(name, result).to_json()
        }
        Command::Missing { deck, set } => {
            let catalog = load_catalog(config, base_dir)?;
            let owned = data::load_collection(&data::resolve(
                base_dir,
                &config.data_paths.collection,
            ))
            .context("failed to load collection")?;
            info!("Collection loaded: {} distinct cards owned", owned.len());

            let target = match (deck, set) {
                (Some(deck), _) => CompletionTarget::Deck(
                    data::load_decklist(deck).context("failed to load decklist")?,
                ),
                (None, Some(set)) => CompletionTarget::Set(set.clone()),
                (None, None) => anyhow::bail!("missing needs --deck or --set"),
            };
            let result = report::collection_report(config, &catalog, &owned, &target);
            Report::new(name, result).to_json()
        }
    };

    json.context("failed to serialize report")
}

fn load_ratings(config: &Config, base_dir: &Path) -> anyhow::Result<pickwise_core::RatingTable> {
    let path = data::resolve(base_dir, &config.data_paths.ratings);
    let ratings = data::load_ratings(&path, &config.draft.set_code, &config.draft.format)
        .with_context(|| format!("failed to load ratings from {}", path.display()))?;
    info!(
        "Loaded {} ratings",
        ratings.len_for(&config.draft.set_code, &config.draft.format)
    );
    Ok(ratings)
}

fn load_catalog(config: &Config, base_dir: &Path) -> anyhow::Result<pickwise_core::CardCatalog> {
    let path = data::resolve(base_dir, &config.data_paths.cards);
    let catalog = data::load_cards(&path)
        .with_context(|| format!("failed to load card catalog from {}", path.display()))?;
    info!("Loaded {} cards", catalog.len());
    Ok(catalog)
}
