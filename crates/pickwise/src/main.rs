// Pickwise entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file; stdout carries the JSON report)
// 3. Load config, copying defaults on first run
// 4. Run the command and print its report

use pickwise::app;
use pickwise::cli::Cli;
use pickwise::config;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // 1. Parse the command line
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing(&cli.home)?;
    info!("Pickwise starting up");

    // 3. Load config
    let mut config = config::load_config(&cli.home).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    info!(
        "Config loaded: set={}, format={}",
        config.draft.set_code, config.draft.format
    );

    // 4. Run the command
    match app::run(&cli.command, &config, &cli.home) {
        Ok(json) => {
            println!("{json}");
            info!("Pickwise finished {}", cli.command.name());
            Ok(())
        }
        Err(e) => {
            error!("{} failed: {:#}", cli.command.name(), e);
            Err(e)
        }
    }
}

/// Set up tracing to log to a file, since stdout is reserved for reports.
fn init_tracing(home: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let log_dir = home.join("logs");
    std::fs::create_dir_all(&log_dir).context("failed to create logs directory")?;

    let log_file = std::fs::File::create(log_dir.join("pickwise.log"))
        .context("failed to create log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pickwise=info,pickwise_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
