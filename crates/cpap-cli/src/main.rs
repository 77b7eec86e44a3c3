//! cpap CLI - CPAP therapy insights
//!
//! Usage:
//!   cpap insights --file sessions.json        Ranked clinical insights
//!   cpap summary --file sessions.csv          Compliance and sleep-quality summary
//!   cpap compare --file F --first A..B --second C..D
//!   cpap score --ahi 3 --duration 8 --leak 5  Score one night

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use cpap_core::AnalysisConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let (config, source) = AnalysisConfig::load(cli.config.as_deref())?;
    tracing::debug!(%source, "Loaded analysis config");

    match cli.command {
        Commands::Insights { file, json } => commands::cmd_insights(&file, json, &config),
        Commands::Summary { file, days, json } => {
            commands::cmd_summary(&file, days, json, &config)
        }
        Commands::Compare {
            file,
            first,
            second,
            json,
        } => commands::cmd_compare(&file, first, second, json, &config),
        Commands::Score {
            ahi,
            duration,
            leak,
            json,
        } => commands::cmd_score(ahi, duration, leak, json, &config),
        Commands::Config => commands::cmd_config(&config, &source),
    }
}
