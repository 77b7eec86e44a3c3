//! Insights command implementation

use std::fmt::{self, Write};
use std::path::Path;

use anyhow::Result;
use cpap_core::{generate_insights, AnalysisConfig, Insight};

use super::{load, wants_json};

pub fn cmd_insights(file: &Path, json: bool, config: &AnalysisConfig) -> Result<()> {
    let sessions = load(file, config)?;
    let insights = generate_insights(&sessions);

    if wants_json(json, config) {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        print!("{}", render_insights(&insights, sessions.len())?);
    }
    Ok(())
}

/// Human-readable insight report
pub fn render_insights(insights: &[Insight], nights: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "💡 Therapy Insights ({} nights analyzed)", nights)?;
    writeln!(
        out,
        "   ─────────────────────────────────────────────────────────────"
    )?;

    if insights.is_empty() {
        writeln!(out, "   No insights yet. Keep recording your nightly sessions.")?;
        writeln!(out)?;
        return Ok(out);
    }

    for (i, insight) in insights.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "   {}. {}  [{}, priority {}]",
            i + 1,
            insight.title(),
            insight.insight_type(),
            insight.priority()
        )?;
        writeln!(out, "      {}", insight.message())?;
        for step in insight.next_steps() {
            writeln!(out, "      → {}", step)?;
        }
    }

    writeln!(out)?;
    Ok(out)
}
