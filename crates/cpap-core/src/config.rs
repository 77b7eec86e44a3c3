//! Analysis configuration
//!
//! Governs reporting windows, import parsing and output format. Clinical
//! thresholds are fixed in the rules and are not configurable.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. The override in the data dir (~/.local/share/cpap-insights/config/analysis.toml)
//! 3. The embedded defaults (compiled into binary)

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::import::{ImportOptions, DEFAULT_DATE_FORMATS};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// How reports are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

/// Effective analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Nights covered by the summary report
    pub window_days: u32,
    pub date_formats: Vec<String>,
    pub compute_missing_quality: bool,
    pub output_format: OutputFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            compute_missing_quality: true,
            output_format: OutputFormat::Text,
        }
    }
}

impl AnalysisConfig {
    /// Load using the standard resolution order
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        load_config(explicit)
    }

    /// Import settings derived from this configuration
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            date_formats: self.date_formats.clone(),
            compute_missing_quality: self.compute_missing_quality,
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| {
        d.join("cpap-insights")
            .join("config")
            .join("analysis.toml")
    })
}

/// Load configuration (explicit path, then override, then default)
fn load_config(explicit: Option<&Path>) -> Result<(AnalysisConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        return Ok((parse_config(&content)?, ConfigSource::File(path.to_path_buf())));
    }

    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let content = fs::read_to_string(&default_path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
            debug!(path = %default_path.display(), "Using config override");
            return Ok((parse_config(&content)?, ConfigSource::File(default_path)));
        }
    }

    Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    summary: Option<RawSummary>,
    import: Option<RawImport>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    window_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    date_formats: Option<Vec<String>>,
    compute_missing_quality: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    format: Option<String>,
}

/// Parse config from TOML content; absent keys keep their defaults
fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(summary) = raw.summary {
        if let Some(days) = summary.window_days {
            if days == 0 {
                return Err(Error::Config("summary.window_days must be at least 1".into()));
            }
            config.window_days = days;
        }
    }

    if let Some(import) = raw.import {
        if let Some(formats) = import.date_formats {
            if formats.is_empty() {
                return Err(Error::Config("import.date_formats must not be empty".into()));
            }
            config.date_formats = formats;
        }
        if let Some(compute) = import.compute_missing_quality {
            config.compute_missing_quality = compute;
        }
    }

    if let Some(output) = raw.output {
        if let Some(format) = output.format {
            config.output_format = format.parse().map_err(Error::Config)?;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[summary]\nwindow_days = 14\n").unwrap();
        assert_eq!(config.window_days, 14);
        assert!(config.compute_missing_quality);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.date_formats.len(), 3);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[output]\nformat = \"JSON\"\ncolor = true\n[extra]\nx = 1\n").unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(parse_config("[summary]\nwindow_days = 0\n"), Err(Error::Config(_))));
        assert!(matches!(parse_config("[import]\ndate_formats = []\n"), Err(Error::Config(_))));
        assert!(matches!(parse_config("[output]\nformat = \"xml\"\n"), Err(Error::Config(_))));
        assert!(matches!(parse_config("[summary\n"), Err(Error::Config(_))));
    }

    #[test]
    fn test_import_options() {
        let config = parse_config("[import]\ndate_formats = [\"%d.%m.%Y\"]\ncompute_missing_quality = false\n").unwrap();
        let options = config.import_options();
        assert_eq!(options.date_formats, ["%d.%m.%Y"]);
        assert!(!options.compute_missing_quality);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[summary]\nwindow_days = 7").unwrap();

        let (config, source) = AnalysisConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.window_days, 7);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = AnalysisConfig::load(Some(Path::new("/nonexistent/analysis.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
