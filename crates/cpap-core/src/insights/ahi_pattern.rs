//! AHI Pattern Rule
//!
//! Two-week AHI average combined with the direction of the most recent week.

use crate::models::SessionRecord;
use crate::stats::{mean, trend, TREND_SIGNIFICANCE};

use super::engine::{skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const MIN_NIGHTS: usize = 14;
/// Minimum AHI readings in the window
const MIN_READINGS: usize = 7;
const TREND_POINTS: usize = 7;

/// AHI level and short-term trend
pub struct AhiPatternRule;

impl InsightRule for AhiPatternRule {
    fn id(&self) -> RuleId {
        RuleId::AhiPattern
    }

    fn name(&self) -> &'static str {
        "AHI Pattern"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.len() < MIN_NIGHTS {
            return skip(self.id(), "fewer than 14 nights");
        }

        let ahis: Vec<f64> = trailing(sessions, MIN_NIGHTS)
            .iter()
            .filter_map(SessionRecord::ahi_value)
            .collect();
        if ahis.len() < MIN_READINGS {
            return skip(self.id(), "fewer than 7 AHI readings");
        }

        let Some(avg_ahi) = mean(&ahis) else {
            return vec![];
        };
        let slope = trend(&ahis[ahis.len() - TREND_POINTS..]);

        let mut insights = Vec::new();

        if avg_ahi < 5.0 {
            if slope < -TREND_SIGNIFICANCE {
                insights.push(
                    Insight::new(
                        InsightType::Improvement,
                        "🎯 AHI Improving",
                        format!(
                            "Excellent! Your AHI dropped to {:.1} (normal range) and continues improving. Your therapy adjustments are working perfectly.",
                            avg_ahi
                        ),
                        Confidence::High,
                        ClinicalRelevance::High,
                        4,
                    )
                    .informational()
                    .with_data_point("current_ahi", avg_ahi)
                    .with_data_point("trend", slope),
                );
            } else {
                insights.push(
                    Insight::new(
                        InsightType::Achievement,
                        "✅ Optimal AHI Control",
                        format!(
                            "Your AHI is excellently controlled at {:.1} events/hour. This indicates very effective therapy - maintain your current routine.",
                            avg_ahi
                        ),
                        Confidence::High,
                        ClinicalRelevance::High,
                        3,
                    )
                    .informational()
                    .with_data_point("current_ahi", avg_ahi),
                );
            }
        } else if avg_ahi > 10.0 && slope > TREND_SIGNIFICANCE {
            insights.push(
                Insight::new(
                    InsightType::Alert,
                    "🚨 AHI Trending Higher",
                    format!(
                        "Your AHI has increased to {:.1} events/hour. This suggests therapy effectiveness may be declining.",
                        avg_ahi
                    ),
                    Confidence::High,
                    ClinicalRelevance::High,
                    9,
                )
                .with_data_point("current_ahi", avg_ahi)
                .with_data_point("trend", slope)
                .with_next_steps(&[
                    "Check mask seal and fit",
                    "Review sleep position habits",
                    "Schedule pressure adjustment consultation",
                    "Examine recent lifestyle changes",
                ]),
            );
        }

        insights
    }
}
