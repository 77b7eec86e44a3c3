//! Core types for the Insight Engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of finding an insight reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Achievement,
    Improvement,
    Concern,
    Recommendation,
    Trend,
    Alert,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Achievement => "achievement",
            InsightType::Improvement => "improvement",
            InsightType::Concern => "concern",
            InsightType::Recommendation => "recommendation",
            InsightType::Trend => "trend",
            InsightType::Alert => "alert",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "achievement" => Ok(InsightType::Achievement),
            "improvement" => Ok(InsightType::Improvement),
            "concern" => Ok(InsightType::Concern),
            "recommendation" => Ok(InsightType::Recommendation),
            "trend" => Ok(InsightType::Trend),
            "alert" => Ok(InsightType::Alert),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// How sure the rule is about its finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            _ => Err(format!("Unknown confidence level: {}", s)),
        }
    }
}

/// How much the finding matters for treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalRelevance {
    High,
    Medium,
    Low,
}

impl ClinicalRelevance {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicalRelevance::High => "high",
            ClinicalRelevance::Medium => "medium",
            ClinicalRelevance::Low => "low",
        }
    }

    /// Ranking tiebreak: only high relevance outranks at equal priority
    pub fn is_high(&self) -> bool {
        matches!(self, ClinicalRelevance::High)
    }
}

impl fmt::Display for ClinicalRelevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClinicalRelevance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(ClinicalRelevance::High),
            "medium" => Ok(ClinicalRelevance::Medium),
            "low" => Ok(ClinicalRelevance::Low),
            _ => Err(format!("Unknown clinical relevance: {}", s)),
        }
    }
}

/// Identifies the rule evaluator that produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    ComplianceTrend,
    AhiPattern,
    QualityTrend,
    EquipmentPerformance,
    SleepDuration,
    ConcerningPattern,
    Milestones,
    Optimization,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ComplianceTrend => "compliance_trend",
            RuleId::AhiPattern => "ahi_pattern",
            RuleId::QualityTrend => "quality_trend",
            RuleId::EquipmentPerformance => "equipment_performance",
            RuleId::SleepDuration => "sleep_duration",
            RuleId::ConcerningPattern => "concerning_pattern",
            RuleId::Milestones => "milestones",
            RuleId::Optimization => "optimization",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compliance_trend" => Ok(RuleId::ComplianceTrend),
            "ahi_pattern" => Ok(RuleId::AhiPattern),
            "quality_trend" => Ok(RuleId::QualityTrend),
            "equipment_performance" => Ok(RuleId::EquipmentPerformance),
            "sleep_duration" => Ok(RuleId::SleepDuration),
            "concerning_pattern" => Ok(RuleId::ConcerningPattern),
            "milestones" => Ok(RuleId::Milestones),
            "optimization" => Ok(RuleId::Optimization),
            _ => Err(format!("Unknown rule: {}", s)),
        }
    }
}

/// A prioritized, human-readable finding about a therapy series
///
/// Fields are read-only once the builder chain ends; rules construct an
/// insight in one expression and hand it to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    insight_type: InsightType,
    title: String,
    message: String,
    confidence: Confidence,
    clinical_relevance: ClinicalRelevance,
    actionable: bool,
    data_points: BTreeMap<String, f64>,
    next_steps: Vec<String>,
    /// 1-10, higher is more urgent
    priority: u8,
    #[serde(rename = "timestamp")]
    generated_at: DateTime<Utc>,
}

impl Insight {
    /// Create an actionable insight with the current timestamp
    pub fn new(
        insight_type: InsightType,
        title: impl Into<String>,
        message: impl Into<String>,
        confidence: Confidence,
        clinical_relevance: ClinicalRelevance,
        priority: u8,
    ) -> Self {
        Self {
            insight_type,
            title: title.into(),
            message: message.into(),
            confidence,
            clinical_relevance,
            actionable: true,
            data_points: BTreeMap::new(),
            next_steps: Vec::new(),
            priority,
            generated_at: Utc::now(),
        }
    }

    /// Mark as purely informational (nothing for the patient to do)
    pub fn informational(mut self) -> Self {
        self.actionable = false;
        self
    }

    /// Attach a named piece of numeric evidence
    pub fn with_data_point(mut self, name: impl Into<String>, value: f64) -> Self {
        self.data_points.insert(name.into(), value);
        self
    }

    /// Set the recommended actions, in order
    pub fn with_next_steps(mut self, steps: &[&str]) -> Self {
        self.next_steps = steps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn insight_type(&self) -> InsightType {
        self.insight_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn clinical_relevance(&self) -> ClinicalRelevance {
        self.clinical_relevance
    }

    pub fn actionable(&self) -> bool {
        self.actionable
    }

    pub fn data_points(&self) -> &BTreeMap<String, f64> {
        &self.data_points
    }

    pub fn data_point(&self, name: &str) -> Option<f64> {
        self.data_points.get(name).copied()
    }

    pub fn next_steps(&self) -> &[String] {
        &self.next_steps
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}
