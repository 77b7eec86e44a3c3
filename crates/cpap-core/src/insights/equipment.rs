//! Equipment Performance Rule
//!
//! Mask leak over the last week. Runs with any amount of history as long as
//! at least one leak reading is present.

use crate::models::SessionRecord;
use crate::stats::mean;

use super::engine::{skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const WINDOW: usize = 7;
/// L/min; above this the seal is leaking enough to matter
const LEAK_LIMIT: f64 = 24.0;
const GOOD_SEAL: f64 = 10.0;

/// Mask seal quality from average leak
pub struct EquipmentPerformanceRule;

impl InsightRule for EquipmentPerformanceRule {
    fn id(&self) -> RuleId {
        RuleId::EquipmentPerformance
    }

    fn name(&self) -> &'static str {
        "Equipment Performance"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        let leaks: Vec<f64> = trailing(sessions, WINDOW)
            .iter()
            .filter_map(SessionRecord::leak_value)
            .collect();
        let Some(avg_leak) = mean(&leaks) else {
            return skip(self.id(), "no leak readings this week");
        };
        let high_leak_nights = leaks.iter().filter(|l| **l > LEAK_LIMIT).count();

        let mut insights = Vec::new();

        if avg_leak > LEAK_LIMIT {
            insights.push(
                Insight::new(
                    InsightType::Recommendation,
                    "🔧 Mask Fit Optimization",
                    format!(
                        "Your mask leak averages {:.1} L/min (target: <24). High leaks reduce therapy effectiveness.",
                        avg_leak
                    ),
                    Confidence::High,
                    ClinicalRelevance::High,
                    7,
                )
                .with_data_point("avg_leak", avg_leak)
                .with_data_point("high_leak_nights", high_leak_nights as f64)
                .with_next_steps(&[
                    "Readjust mask straps (not too tight)",
                    "Check for worn mask cushions",
                    "Try different mask size/style",
                    "Clean mask components thoroughly",
                ]),
            );
        } else if avg_leak < GOOD_SEAL {
            insights.push(
                Insight::new(
                    InsightType::Achievement,
                    "🎯 Perfect Mask Seal",
                    format!(
                        "Excellent mask fit with only {:.1} L/min average leak. Your equipment is optimally adjusted.",
                        avg_leak
                    ),
                    Confidence::High,
                    ClinicalRelevance::Medium,
                    2,
                )
                .informational()
                .with_data_point("avg_leak", avg_leak),
            );
        }

        insights
    }
}
