//! Insight Engine - Clinical Therapy Insights
//!
//! Turns a series of nightly sessions into a short, ranked list of
//! observations a patient can act on. Each rule is a pure function of the
//! date-sorted series; the engine runs all of them, then ranks by priority
//! and clinical relevance and keeps the top eight.
//!
//! ## Built-in Rules
//!
//! - **Compliance Trend** - Weekly usage rate and hours
//! - **AHI Pattern** - Two-week AHI level and direction
//! - **Quality Trend** - This week's quality score against the prior month
//! - **Equipment Performance** - Mask leak
//! - **Sleep Duration** - Length and consistency of nightly use
//! - **Concerning Pattern** - Sudden AHI spikes
//! - **Milestones** - 30-night AHI control and perfect-week streaks
//! - **Optimization** - Pressure titration opportunities
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cpap_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! let insights = engine.analyze(&sessions);
//! ```

pub mod ahi_pattern;
pub mod compliance;
pub mod concerning_pattern;
pub mod engine;
pub mod equipment;
pub mod milestones;
pub mod optimization;
pub mod quality_trend;
pub mod sleep_duration;
pub mod types;

pub use ahi_pattern::AhiPatternRule;
pub use compliance::ComplianceTrendRule;
pub use concerning_pattern::ConcerningPatternRule;
pub use engine::{generate_insights, InsightEngine, InsightRule, MAX_INSIGHTS};
pub use equipment::EquipmentPerformanceRule;
pub use milestones::MilestonesRule;
pub use optimization::OptimizationRule;
pub use quality_trend::QualityTrendRule;
pub use sleep_duration::SleepDurationRule;
pub use types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};
