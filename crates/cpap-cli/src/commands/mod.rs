//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `config` - Show the effective analysis configuration
//! - `insights` - Ranked clinical insights
//! - `reports` - Summary and period comparison reports
//! - `score` - Single-night quality score

pub mod config;
pub mod insights;
pub mod reports;
pub mod score;

use std::path::Path;

use anyhow::{Context, Result};
use cpap_core::{load_sessions, AnalysisConfig, OutputFormat, SessionRecord};

// Re-export command functions for main.rs
pub use config::*;
pub use insights::*;
pub use reports::*;
pub use score::*;

/// Load a session export using the configured import settings
pub fn load(file: &Path, config: &AnalysisConfig) -> Result<Vec<SessionRecord>> {
    let sessions = load_sessions(file, &config.import_options())
        .with_context(|| format!("Failed to load sessions from {}", file.display()))?;
    tracing::info!(count = sessions.len(), "Loaded sessions from {}", file.display());
    Ok(sessions)
}

/// `--json` wins; otherwise the configured output format
pub fn wants_json(flag: bool, config: &AnalysisConfig) -> bool {
    flag || config.output_format == OutputFormat::Json
}

/// Format an optional value with one decimal, or a dash
pub fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit),
        None => "—".to_string(),
    }
}

/// Format a signed change with one decimal, or a dash
pub fn fmt_change(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:+.1}{}", v, unit),
        None => "—".to_string(),
    }
}
