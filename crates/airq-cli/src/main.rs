use std::io;

use airq_store::{LocalStore, StoreLocation};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod demo;
mod format;
mod style;
mod util;

use cli::{Cli, Commands};
use commands::{
    cmd_cleanup, cmd_config, cmd_favorite, cmd_history, cmd_preference, cmd_reading, cmd_seed,
    cmd_stats, cmd_theme, cmd_threshold,
};
use config::{Config, resolve_db_path};
use format::FormatOptions;
use util::open_store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "airq", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so JSON and CSV on stdout stay parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let opts = FormatOptions::new(cli.no_color, cli.json);

    let db_path = resolve_db_path(cli.db, &config);
    tracing::debug!("Using database {}", db_path.display());
    let store = LocalStore::new(StoreLocation::File(db_path));

    match cli.command {
        Commands::Completions { .. } => return Ok(()),
        Commands::Config { action } => return cmd_config(action, &config, &opts),
        Commands::Reading { action } => {
            cmd_reading(open_store(&store).await?, action, &config, &opts).await?;
        }
        Commands::History { action } => {
            cmd_history(open_store(&store).await?, action, &config, &opts).await?;
        }
        Commands::Preference { action } => {
            cmd_preference(open_store(&store).await?, action, &opts).await?;
        }
        Commands::Favorite { action } => {
            cmd_favorite(open_store(&store).await?, action, &config, &opts).await?;
        }
        Commands::Threshold { value } => {
            cmd_threshold(open_store(&store).await?, value, &opts).await?;
        }
        Commands::Theme { theme, toggle } => {
            cmd_theme(open_store(&store).await?, theme, toggle, &opts).await?;
        }
        Commands::Cleanup {
            reading_days,
            history_days,
        } => {
            cmd_cleanup(
                open_store(&store).await?,
                reading_days,
                history_days,
                &config,
                &opts,
            )
            .await?;
        }
        Commands::Seed { city, days } => {
            cmd_seed(open_store(&store).await?, &city, days, &opts).await?;
        }
        Commands::Stats { city } => {
            cmd_stats(open_store(&store).await?, city, &opts).await?;
        }
    }

    store.close().await?;
    Ok(())
}
