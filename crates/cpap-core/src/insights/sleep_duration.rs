//! Sleep Duration Rule
//!
//! Two weeks of recorded usage: length and night-to-night consistency.

use crate::models::SessionRecord;
use crate::stats::{mean, stdev};

use super::engine::{skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const MIN_NIGHTS: usize = 7;
const WINDOW: usize = 14;

/// Average nightly hours and their spread
pub struct SleepDurationRule;

impl InsightRule for SleepDurationRule {
    fn id(&self) -> RuleId {
        RuleId::SleepDuration
    }

    fn name(&self) -> &'static str {
        "Sleep Duration"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.len() < MIN_NIGHTS {
            return skip(self.id(), "fewer than 7 nights");
        }

        let hours: Vec<f64> = trailing(sessions, WINDOW)
            .iter()
            .filter_map(SessionRecord::recorded_duration)
            .collect();
        let Some(avg_hours) = mean(&hours) else {
            return skip(self.id(), "no usage recorded");
        };
        let spread = stdev(&hours);

        if avg_hours >= 8.0 && spread < 1.0 {
            vec![Insight::new(
                InsightType::Achievement,
                "😴 Optimal Sleep Pattern",
                format!(
                    "Perfect! You're averaging {:.1} hours with consistent timing. This maximizes therapy benefits.",
                    avg_hours
                ),
                Confidence::High,
                ClinicalRelevance::Medium,
                2,
            )
            .informational()
            .with_data_point("avg_hours", avg_hours)
            .with_data_point("consistency", spread)]
        } else if avg_hours < 6.0 {
            vec![Insight::new(
                InsightType::Recommendation,
                "⏰ Sleep Duration Focus",
                format!(
                    "You're averaging {:.1} hours nightly. Aim for 7-8 hours to maximize therapy effectiveness and health benefits.",
                    avg_hours
                ),
                Confidence::High,
                ClinicalRelevance::High,
                6,
            )
            .with_data_point("avg_hours", avg_hours)
            .with_next_steps(&[
                "Establish consistent bedtime routine",
                "Limit screen time before bed",
                "Create optimal sleep environment",
                "Consider earlier bedtime",
            ])]
        } else {
            vec![]
        }
    }
}
