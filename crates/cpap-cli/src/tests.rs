//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::Path;

use clap::Parser;
use cpap_core::test_utils::{nightly, series, SessionSpec};
use cpap_core::{
    compare_periods, generate_insights, summarize, AnalysisConfig, ConfigSource, OutputFormat,
    SessionRecord,
};
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands};
use crate::commands::{self, fmt_change, fmt_opt};

/// Write sessions to a temporary JSON export
fn session_file(sessions: &[SessionRecord]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(serde_json::to_string(sessions).unwrap().as_bytes())
        .unwrap();
    file
}

fn struggling_week() -> Vec<SessionRecord> {
    nightly(7, SessionSpec::default().duration(2.0).leak(35.0))
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_insights_args() {
    let cli = Cli::try_parse_from(["cpap", "insights", "--file", "s.json", "--json"]).unwrap();
    assert!(!cli.verbose);
    match cli.command {
        Commands::Insights { file, json } => {
            assert_eq!(file, Path::new("s.json"));
            assert!(json);
        }
        _ => panic!("expected insights command"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "cpap", "summary", "-f", "s.csv", "--days", "14", "-v", "--config", "a.toml",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config.as_deref(), Some(Path::new("a.toml")));
    match cli.command {
        Commands::Summary { days, json, .. } => {
            assert_eq!(days, Some(14));
            assert!(!json);
        }
        _ => panic!("expected summary command"),
    }
}

#[test]
fn test_parse_compare_ranges() {
    let cli = Cli::try_parse_from([
        "cpap",
        "compare",
        "--file",
        "s.json",
        "--first",
        "2025-01-01..2025-01-07",
        "--second",
        "2025-01-08..2025-01-14",
    ])
    .unwrap();
    match cli.command {
        Commands::Compare { first, second, .. } => {
            assert_eq!(first.days(), 7);
            assert!(first.end < second.start);
        }
        _ => panic!("expected compare command"),
    }

    assert!(Cli::try_parse_from([
        "cpap", "compare", "--file", "s.json", "--first", "2025-01-07..2025-01-01", "--second",
        "2025-01-08..2025-01-14",
    ])
    .is_err());
}

#[test]
fn test_parse_score_requires_all_inputs() {
    assert!(Cli::try_parse_from(["cpap", "score", "--ahi", "3", "--duration", "8"]).is_err());
    assert!(
        Cli::try_parse_from(["cpap", "score", "--ahi", "3", "--duration", "8", "--leak", "5"])
            .is_ok()
    );
}

// ========== Command Tests ==========

#[test]
fn test_cmd_insights() {
    let file = session_file(&struggling_week());
    let config = AnalysisConfig::default();

    assert!(commands::cmd_insights(file.path(), false, &config).is_ok());
    assert!(commands::cmd_insights(file.path(), true, &config).is_ok());
}

#[test]
fn test_cmd_insights_missing_file() {
    let result = commands::cmd_insights(
        Path::new("/nonexistent/sessions.json"),
        false,
        &AnalysisConfig::default(),
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to load sessions"));
}

#[test]
fn test_cmd_insights_rejects_non_array() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"date": "2025-01-01"}"#).unwrap();

    let result = commands::cmd_insights(file.path(), false, &AnalysisConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_cmd_summary() {
    let file = session_file(&nightly(40, SessionSpec::default()));
    let config = AnalysisConfig::default();

    assert!(commands::cmd_summary(file.path(), None, false, &config).is_ok());
    assert!(commands::cmd_summary(file.path(), Some(7), true, &config).is_ok());
    assert!(commands::cmd_summary(file.path(), Some(0), false, &config).is_err());
}

#[test]
fn test_cmd_summary_empty_file() {
    let file = session_file(&[]);
    assert!(commands::cmd_summary(file.path(), None, false, &AnalysisConfig::default()).is_ok());
}

#[test]
fn test_cmd_compare() {
    let file = session_file(&nightly(14, SessionSpec::default()));
    let result = commands::cmd_compare(
        file.path(),
        "2025-01-01..2025-01-07".parse().unwrap(),
        "2025-01-08..2025-01-14".parse().unwrap(),
        false,
        &AnalysisConfig::default(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_score() {
    let config = AnalysisConfig::default();
    assert!(commands::cmd_score(3.0, 8.0, 5.0, false, &config).is_ok());
    assert!(commands::cmd_score(3.0, 8.0, 5.0, true, &config).is_ok());
    assert!(commands::cmd_score(-1.0, 8.0, 5.0, false, &config).is_err());
    assert!(commands::cmd_score(f64::NAN, 8.0, 5.0, false, &config).is_err());
}

#[test]
fn test_cmd_config() {
    let config = AnalysisConfig::default();
    assert!(commands::cmd_config(&config, &ConfigSource::Embedded).is_ok());
}

#[test]
fn test_wants_json() {
    let mut config = AnalysisConfig::default();
    assert!(!commands::wants_json(false, &config));
    assert!(commands::wants_json(true, &config));

    config.output_format = OutputFormat::Json;
    assert!(commands::wants_json(false, &config));
}

#[test]
fn test_load_applies_import_options() {
    let mut sessions = nightly(3, SessionSpec::default());
    sessions[0].quality_score = Some(42.0);
    let file = session_file(&sessions);

    let mut config = AnalysisConfig::default();
    let loaded = commands::load(file.path(), &config).unwrap();
    assert_eq!(loaded[0].quality_score, Some(42.0));
    assert!(loaded[1].quality_score.is_some());

    config.compute_missing_quality = false;
    let loaded = commands::load(file.path(), &config).unwrap();
    assert_eq!(loaded[1].quality_score, None);
}

// ========== Rendering Tests ==========

#[test]
fn test_render_insights() {
    let sessions = struggling_week();
    let text = commands::render_insights(&generate_insights(&sessions), sessions.len()).unwrap();

    assert!(text.contains("7 nights analyzed"));
    assert!(text.contains("1. ⚠️ Compliance Below Target  [concern, priority 10]"));
    assert!(text.contains("🔧 Mask Fit Optimization"));
    assert!(text.contains("→ Readjust mask straps (not too tight)"));
}

#[test]
fn test_render_insights_empty() {
    let text = commands::render_insights(&[], 0).unwrap();
    assert!(text.contains("No insights yet"));
}

#[test]
fn test_render_summary() {
    let sessions = series(10, |i| {
        SessionSpec::default().duration(if i < 5 { 3.0 } else { 8.0 })
    });
    let text = commands::render_summary(&summarize(&sessions, 10).unwrap()).unwrap();

    assert!(text.contains("2025-01-01..2025-01-10"));
    assert!(text.contains("5 of 10 compliant (≥4h)"));
    assert!(text.contains("50.0%"));
    assert!(text.contains("AHI trend:     stable"));
}

#[test]
fn test_render_comparison() {
    let sessions = series(14, |i| {
        SessionSpec::default().ahi(if i < 7 { 9.0 } else { 4.0 })
    });
    let comparison = compare_periods(
        &sessions,
        "2025-01-01..2025-01-07".parse().unwrap(),
        "2025-01-08..2025-01-14".parse().unwrap(),
    );
    let text = commands::render_comparison(&comparison).unwrap();

    assert!(text.contains("2025-01-08..2025-01-14"));
    assert!(text.contains("-5.0"));
    assert!(text.contains("+0.0%"));
}

#[test]
fn test_formatters() {
    assert_eq!(fmt_opt(Some(7.26), " h"), "7.3 h");
    assert_eq!(fmt_opt(None, " h"), "—");
    assert_eq!(fmt_change(Some(1.0), "%"), "+1.0%");
    assert_eq!(fmt_change(Some(-0.34), ""), "-0.3");
}
