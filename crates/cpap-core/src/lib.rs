//! CPAP Insights Core Library
//!
//! Clinical analysis of nightly CPAP therapy sessions:
//! - Session model with lenient numeric fields
//! - Nightly quality score calculator
//! - Rule-based insight engine with priority ranking
//! - Compliance and sleep-quality summaries
//! - JSON and CSV session importers
//! - TOML analysis configuration

pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod quality;
pub mod stats;
pub mod summary;

/// Test utilities: synthetic session series
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{AnalysisConfig, ConfigSource, OutputFormat};
pub use error::{Error, Result};
pub use import::{load_sessions, parse_csv, parse_json, ImportOptions};
pub use insights::{
    generate_insights, ClinicalRelevance, Confidence, Insight, InsightEngine, InsightRule,
    InsightType, RuleId, MAX_INSIGHTS,
};
pub use models::{SessionRecord, COMPLIANT_HOURS};
pub use quality::{quality_score, QualityBreakdown};
pub use stats::{Polarity, TrendDirection};
pub use summary::{
    compare_periods, summarize, ComplianceMetrics, DateRange, PeriodComparison, PeriodMetrics,
    SleepQualityMetrics, TherapySummary,
};
