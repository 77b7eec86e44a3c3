//! Therapy quality score (0-100)
//!
//! Composite of three component scores, weighted by clinical importance:
//!
//! | Component | Weight | Full marks |
//! |-----------|--------|------------|
//! | AHI       | 0.5    | ≤ 5 events/hour |
//! | Duration  | 0.3    | ≥ 7 hours |
//! | Leak      | 0.2    | 0 L/min, linear to 80 at 24 L/min |

use serde::Serialize;

const AHI_WEIGHT: f64 = 0.5;
const DURATION_WEIGHT: f64 = 0.3;
const LEAK_WEIGHT: f64 = 0.2;

/// Component scores behind a composite quality score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub ahi_score: f64,
    pub duration_score: f64,
    pub leak_score: f64,
    /// Weighted composite, clamped to [0, 100] and rounded to one decimal
    pub composite: f64,
}

impl QualityBreakdown {
    /// Score a night. Returns `None` when any input is non-finite or negative.
    pub fn calculate(ahi: f64, duration_hours: f64, mask_leak: f64) -> Option<Self> {
        if [ahi, duration_hours, mask_leak]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return None;
        }

        let ahi_score = ahi_component(ahi);
        let duration_score = duration_component(duration_hours);
        let leak_score = leak_component(mask_leak);

        let weighted =
            ahi_score * AHI_WEIGHT + duration_score * DURATION_WEIGHT + leak_score * LEAK_WEIGHT;

        Some(Self {
            ahi_score,
            duration_score,
            leak_score,
            composite: round1(weighted.clamp(0.0, 100.0)),
        })
    }
}

/// Composite quality score, or `None` if any input is missing or not a usable number
pub fn quality_score(
    ahi: Option<f64>,
    duration_hours: Option<f64>,
    mask_leak: Option<f64>,
) -> Option<f64> {
    QualityBreakdown::calculate(ahi?, duration_hours?, mask_leak?).map(|b| b.composite)
}

fn ahi_component(ahi: f64) -> f64 {
    if ahi <= 5.0 {
        100.0
    } else if ahi <= 15.0 {
        100.0 - (ahi - 5.0) * 5.0
    } else {
        // Steeper decline above 15
        (50.0 - (ahi - 15.0) * 2.0).max(0.0)
    }
}

fn duration_component(hours: f64) -> f64 {
    if hours >= 7.0 {
        100.0
    } else if hours >= 4.0 {
        (hours / 7.0) * 100.0
    } else {
        ((hours / 4.0) * 50.0).max(0.0)
    }
}

fn leak_component(leak: f64) -> f64 {
    if leak <= 24.0 {
        100.0 - (leak / 24.0) * 20.0
    } else {
        (80.0 - (leak - 24.0) * 2.0).max(0.0)
    }
}

/// Round to one decimal on the exact binary value, ties to even
///
/// Scaling by 10 first would round twice; formatting rounds the exact
/// decimal expansion once.
pub(crate) fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
