//! Quality Trend Rule
//!
//! Compares this week's quality scores with the preceding weeks (up to 30
//! nights back). The two bands are independent: a rising week that also
//! lands in premium territory yields both insights.

use crate::models::SessionRecord;
use crate::stats::mean;

use super::engine::{back_window, skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const MIN_NIGHTS: usize = 10;
const RECENT: usize = 7;
const HISTORY: usize = 30;

/// Week-over-baseline change in quality score
pub struct QualityTrendRule;

impl InsightRule for QualityTrendRule {
    fn id(&self) -> RuleId {
        RuleId::QualityTrend
    }

    fn name(&self) -> &'static str {
        "Quality Trend"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.len() < MIN_NIGHTS {
            return skip(self.id(), "fewer than 10 nights");
        }

        let recent: Vec<f64> = trailing(sessions, RECENT)
            .iter()
            .filter_map(SessionRecord::recorded_quality)
            .collect();
        let historical: Vec<f64> = back_window(sessions, HISTORY, RECENT)
            .iter()
            .filter_map(SessionRecord::recorded_quality)
            .collect();

        let (Some(recent_avg), Some(historical_avg)) = (mean(&recent), mean(&historical)) else {
            return skip(self.id(), "no quality scores to compare");
        };
        let improvement = recent_avg - historical_avg;

        let mut insights = Vec::new();

        if improvement > 5.0 {
            insights.push(
                Insight::new(
                    InsightType::Improvement,
                    "📊 Quality Score Rising",
                    format!(
                        "Your therapy quality improved by {:.1} points this week (now {:.1}%). Keep up the excellent work!",
                        improvement, recent_avg
                    ),
                    Confidence::High,
                    ClinicalRelevance::Medium,
                    3,
                )
                .informational()
                .with_data_point("improvement", improvement)
                .with_data_point("current_quality", recent_avg),
            );
        }

        if recent_avg >= 85.0 {
            insights.push(
                Insight::new(
                    InsightType::Achievement,
                    "⭐ Premium Quality Therapy",
                    format!(
                        "Outstanding {:.1}% quality score! You're achieving clinical-grade therapy outcomes.",
                        recent_avg
                    ),
                    Confidence::High,
                    ClinicalRelevance::High,
                    4,
                )
                .informational()
                .with_data_point("current_quality", recent_avg),
            );
        }

        insights
    }
}
