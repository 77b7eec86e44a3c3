//! Optimization Rule
//!
//! Persistent residual AHI at a modest pressure suggests titration. Only
//! considered when every scored night in the window also has pressure data,
//! so the two averages describe the same nights.

use crate::models::SessionRecord;
use crate::stats::mean;

use super::engine::{skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const WINDOW: usize = 14;
const RESIDUAL_AHI: f64 = 7.0;
/// cmH2O
const PRESSURE_HEADROOM: f64 = 12.0;

/// Pressure titration suggestion
pub struct OptimizationRule;

impl InsightRule for OptimizationRule {
    fn id(&self) -> RuleId {
        RuleId::Optimization
    }

    fn name(&self) -> &'static str {
        "Therapy Optimization"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.len() < WINDOW {
            return skip(self.id(), "fewer than 14 nights");
        }

        let window = trailing(sessions, WINDOW);
        let pressures: Vec<f64> = window.iter().filter_map(SessionRecord::recorded_pressure).collect();
        let ahis: Vec<f64> = window.iter().filter_map(SessionRecord::ahi_value).collect();
        if pressures.len() != ahis.len() {
            return skip(self.id(), "pressure and AHI readings do not line up");
        }

        let (Some(avg_ahi), Some(avg_pressure)) = (mean(&ahis), mean(&pressures)) else {
            return skip(self.id(), "no pressure data");
        };

        if avg_ahi > RESIDUAL_AHI && avg_pressure < PRESSURE_HEADROOM {
            vec![Insight::new(
                InsightType::Recommendation,
                "🔧 Pressure Optimization Opportunity",
                format!(
                    "Your AHI averages {:.1} with pressure at {:.1} cmH₂O. A pressure adjustment might improve therapy.",
                    avg_ahi, avg_pressure
                ),
                Confidence::Medium,
                ClinicalRelevance::High,
                6,
            )
            .with_data_point("avg_ahi", avg_ahi)
            .with_data_point("avg_pressure", avg_pressure)
            .with_next_steps(&[
                "Discuss pressure titration with sleep specialist",
                "Consider auto-adjusting CPAP mode",
                "Monitor response to any changes",
                "Keep detailed sleep diary",
            ])]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{nightly, SessionSpec};

    #[test]
    fn test_pressure_recommendation() {
        let sessions = nightly(14, SessionSpec::default().ahi(9.0).pressure(9.5));
        let insights = OptimizationRule.evaluate(&sessions);

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.insight_type(), InsightType::Recommendation);
        assert_eq!(insight.confidence(), Confidence::Medium);
        assert_eq!(insight.priority(), 6);
        assert!(insight.message().contains("9.0"));
        assert!(insight.message().contains("9.5 cmH₂O"));
    }

    #[test]
    fn test_high_pressure_is_silent() {
        let sessions = nightly(14, SessionSpec::default().ahi(9.0).pressure(13.0));
        assert!(OptimizationRule.evaluate(&sessions).is_empty());
    }

    #[test]
    fn test_controlled_ahi_is_silent() {
        let sessions = nightly(14, SessionSpec::default().ahi(7.0).pressure(9.0));
        assert!(OptimizationRule.evaluate(&sessions).is_empty());
    }

    #[test]
    fn test_mismatched_readings_skip() {
        let mut sessions = nightly(14, SessionSpec::default().ahi(9.0).pressure(9.0));
        sessions[5].pressure_avg = Some(0.0);
        assert!(OptimizationRule.evaluate(&sessions).is_empty());
    }

    #[test]
    fn test_without_pressure_data() {
        assert!(OptimizationRule
            .evaluate(&nightly(14, SessionSpec::default().ahi(9.0)))
            .is_empty());
    }

    #[test]
    fn test_insufficient_history() {
        let sessions = nightly(13, SessionSpec::default().ahi(9.0).pressure(9.0));
        assert!(OptimizationRule.evaluate(&sessions).is_empty());
    }
}
