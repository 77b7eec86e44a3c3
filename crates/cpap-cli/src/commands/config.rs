//! Config command implementation

use anyhow::Result;
use cpap_core::config::default_config_path;
use cpap_core::{AnalysisConfig, ConfigSource};

pub fn cmd_config(config: &AnalysisConfig, source: &ConfigSource) -> Result<()> {
    println!();
    println!("⚙️  Analysis Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source: {}", source);
    if let Some(path) = default_config_path() {
        let marker = if path.exists() { "" } else { " (not present)" };
        println!("   Override path: {}{}", path.display(), marker);
    }
    println!();
    println!("   Summary window:     {} nights", config.window_days);
    println!("   Date formats:       {}", config.date_formats.join(", "));
    println!(
        "   Score missing nights: {}",
        if config.compute_missing_quality { "yes" } else { "no" }
    );
    println!("   Output format:      {}", config.output_format);
    println!();
    Ok(())
}
