//! Small statistics helpers shared by the rules and the summary report

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slope magnitude below which a trend is considered flat
pub const TREND_SIGNIFICANCE: f64 = 0.5;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1). Zero for fewer than two values.
pub fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Ordinary least-squares slope of value against position (0..n-1).
///
/// Values are ordered oldest to newest. Returns 0 for fewer than two points
/// or when the index variance denominator is zero.
pub fn trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let n = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

/// Which direction of a metric is clinically better
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// AHI, leak
    LowerIsBetter,
    /// Usage duration, quality score
    HigherIsBetter,
}

/// Clinical reading of a trend slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
}

impl TrendDirection {
    /// Classify a slope against the fixed significance threshold
    pub fn classify(slope: f64, polarity: Polarity) -> Self {
        if !slope.is_finite() || slope.abs() <= TREND_SIGNIFICANCE {
            return Self::Stable;
        }
        let rising = slope > 0.0;
        match (polarity, rising) {
            (Polarity::LowerIsBetter, false) | (Polarity::HigherIsBetter, true) => Self::Improving,
            (Polarity::LowerIsBetter, true) | (Polarity::HigherIsBetter, false) => Self::Worsening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Worsening => "worsening",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
