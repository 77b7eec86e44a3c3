//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cpap_core::DateRange;

/// cpap - Clinical insights from your CPAP therapy data
#[derive(Parser)]
#[command(name = "cpap")]
#[command(about = "Analyze CPAP therapy sessions and surface clinical insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis config file (defaults to the data-dir override, then built-in settings)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate ranked insights from a session export
    Insights {
        /// Session file (.json array or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Print insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compliance and sleep-quality summary for the most recent nights
    Summary {
        /// Session file (.json array or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Nights to include, ending at the latest session (default from config)
        #[arg(short, long)]
        days: Option<u32>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two date ranges
    ///
    /// Ranges are inclusive and written as YYYY-MM-DD..YYYY-MM-DD.
    Compare {
        /// Session file (.json array or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Baseline period
        #[arg(long)]
        first: DateRange,

        /// Period to compare against the baseline
        #[arg(long)]
        second: DateRange,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a single night
    Score {
        /// Apnea-hypopnea index (events/hour)
        #[arg(long)]
        ahi: f64,

        /// Usage in hours
        #[arg(long)]
        duration: f64,

        /// Mask leak (L/min)
        #[arg(long)]
        leak: f64,

        /// Print the score breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and where it came from
    Config,
}
