//! Report command implementations (summary, compare)

use std::fmt::{self, Write};
use std::path::Path;

use anyhow::Result;
use cpap_core::{
    compare_periods, summarize, AnalysisConfig, DateRange, PeriodComparison, TherapySummary,
};

use super::{fmt_change, fmt_opt, load, wants_json};

pub fn cmd_summary(
    file: &Path,
    days: Option<u32>,
    json: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    let window = days.unwrap_or(config.window_days);
    if window == 0 {
        anyhow::bail!("--days must be at least 1");
    }

    let sessions = load(file, config)?;
    let Some(summary) = summarize(&sessions, window) else {
        println!("No sessions found in {}", file.display());
        return Ok(());
    };

    if wants_json(json, config) {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary)?);
    }
    Ok(())
}

pub fn cmd_compare(
    file: &Path,
    first: DateRange,
    second: DateRange,
    json: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    let sessions = load(file, config)?;
    let comparison = compare_periods(&sessions, first, second);

    if comparison.first.nights == 0 || comparison.second.nights == 0 {
        tracing::warn!("One of the periods has no sessions");
    }

    if wants_json(json, config) {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print!("{}", render_comparison(&comparison)?);
    }
    Ok(())
}

/// Human-readable therapy summary
pub fn render_summary(summary: &TherapySummary) -> Result<String, fmt::Error> {
    let compliance = &summary.compliance;
    let quality = &summary.sleep_quality;
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "╭─────────────────────────────────────────╮")?;
    writeln!(out, "│          😴 Therapy Summary             │")?;
    writeln!(out, "╰─────────────────────────────────────────╯")?;
    writeln!(out, "  Period:          {}", summary.period)?;
    writeln!(out)?;
    writeln!(out, "  Compliance")?;
    writeln!(
        out,
        "    Nights:        {} of {} compliant (≥{:.0}h)",
        compliance.compliant_nights, compliance.total_nights, compliance.target_hours
    )?;
    writeln!(out, "    Rate:          {:.1}%", compliance.compliance_rate)?;
    writeln!(
        out,
        "    Avg usage:     {}",
        fmt_opt(compliance.average_usage_hours, " h")
    )?;
    writeln!(out)?;
    writeln!(out, "  Sleep quality")?;
    writeln!(out, "    Avg AHI:       {}", fmt_opt(quality.average_ahi, ""))?;
    writeln!(out, "    AHI trend:     {}", quality.ahi_trend)?;
    writeln!(out, "    Avg leak:      {}", fmt_opt(quality.average_leak, " L/min"))?;
    writeln!(out, "    Avg quality:   {}", fmt_opt(quality.average_quality, ""))?;
    writeln!(out)?;
    Ok(out)
}

/// Human-readable period comparison
pub fn render_comparison(comparison: &PeriodComparison) -> Result<String, fmt::Error> {
    let (a, b) = (&comparison.first, &comparison.second);
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "📈 Period Comparison")?;
    writeln!(
        out,
        "   ─────────────────────────────────────────────────────────────"
    )?;
    writeln!(
        out,
        "   {:<16} {:>24} {:>24} {:>10}",
        "",
        a.period.to_string(),
        b.period.to_string(),
        "Change"
    )?;
    writeln!(out, "   {:<16} {:>24} {:>24}", "Nights", a.nights, b.nights)?;
    writeln!(
        out,
        "   {:<16} {:>24} {:>24} {:>10}",
        "Compliance",
        format!("{:.1}%", a.compliance_rate),
        format!("{:.1}%", b.compliance_rate),
        fmt_change(Some(comparison.compliance_rate_change), "%")
    )?;
    writeln!(
        out,
        "   {:<16} {:>24} {:>24} {:>10}",
        "Avg AHI",
        fmt_opt(a.average_ahi, ""),
        fmt_opt(b.average_ahi, ""),
        fmt_change(comparison.ahi_change, "")
    )?;
    writeln!(
        out,
        "   {:<16} {:>24} {:>24} {:>10}",
        "Avg usage",
        fmt_opt(a.average_usage_hours, " h"),
        fmt_opt(b.average_usage_hours, " h"),
        fmt_change(comparison.usage_change, " h")
    )?;
    writeln!(out)?;
    Ok(out)
}
