//! Milestones Rule - positive reinforcement for long-run control and streaks

use crate::models::SessionRecord;
use crate::stats::mean;

use super::engine::{trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const MILESTONE_NIGHTS: usize = 30;
const STREAK_NIGHTS: usize = 7;

/// 30-night AHI milestone and perfect-week streak
pub struct MilestonesRule;

impl InsightRule for MilestonesRule {
    fn id(&self) -> RuleId {
        RuleId::Milestones
    }

    fn name(&self) -> &'static str {
        "Milestones"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        let mut insights = Vec::new();

        if sessions.len() >= MILESTONE_NIGHTS {
            let ahis: Vec<f64> = sessions.iter().filter_map(SessionRecord::ahi_value).collect();
            if let Some(avg_ahi) = mean(&ahis).filter(|avg| *avg < 5.0) {
                insights.push(
                    Insight::new(
                        InsightType::Achievement,
                        "🎉 30-Day Success Milestone",
                        format!(
                            "Congratulations! You've completed 30 days of therapy with excellent AHI control ({:.1}). You're building lasting healthy habits.",
                            avg_ahi
                        ),
                        Confidence::High,
                        ClinicalRelevance::High,
                        5,
                    )
                    .informational()
                    .with_data_point("avg_ahi", avg_ahi)
                    .with_data_point("total_nights", sessions.len() as f64),
                );
            }
        }

        if sessions.len() >= STREAK_NIGHTS
            && trailing(sessions, STREAK_NIGHTS)
                .iter()
                .all(SessionRecord::is_compliant)
        {
            insights.push(
                Insight::new(
                    InsightType::Achievement,
                    "🔥 Perfect Week Streak",
                    "Amazing! Seven nights in a row of compliant therapy usage. You're mastering your sleep health routine.",
                    Confidence::High,
                    ClinicalRelevance::Medium,
                    4,
                )
                .informational()
                .with_data_point("streak_nights", STREAK_NIGHTS as f64),
            );
        }

        if insights.is_empty() {
            tracing::debug!(rule = self.id().as_str(), "No milestone reached");
        }
        insights
    }
}
