//! Score command implementation

use anyhow::Result;
use cpap_core::{AnalysisConfig, QualityBreakdown};

use super::wants_json;

pub fn cmd_score(
    ahi: f64,
    duration: f64,
    leak: f64,
    json: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    let Some(breakdown) = QualityBreakdown::calculate(ahi, duration, leak) else {
        anyhow::bail!("AHI, duration and leak must be non-negative numbers");
    };

    if wants_json(json, config) {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!();
    println!("⭐ Quality Score: {:.1}", breakdown.composite);
    println!("   ─────────────────────────────");
    println!("   AHI ({:.1}):        {:>5.1} × 0.5", ahi, breakdown.ahi_score);
    println!("   Duration ({:.1} h): {:>5.1} × 0.3", duration, breakdown.duration_score);
    println!("   Leak ({:.1} L/min): {:>5.1} × 0.2", leak, breakdown.leak_score);
    println!();
    Ok(())
}
