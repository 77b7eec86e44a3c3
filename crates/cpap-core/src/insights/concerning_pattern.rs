//! Concerning Pattern Rule
//!
//! A sharp AHI spike in the last five nights after a well-controlled stretch.
//! The comparison stretch is the ten nights before those five; without a full
//! fifteen nights of history the rule stays quiet.

use crate::models::SessionRecord;

use super::engine::{back_window, skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const RECENT: usize = 5;
const MIN_READINGS: usize = 3;
const LOOKBACK: usize = 15;
const SPIKE_AHI: f64 = 15.0;
const CONTROLLED_AHI: f64 = 8.0;

/// Sudden AHI increase against a recent baseline
pub struct ConcerningPatternRule;

impl InsightRule for ConcerningPatternRule {
    fn id(&self) -> RuleId {
        RuleId::ConcerningPattern
    }

    fn name(&self) -> &'static str {
        "Concerning Pattern"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.len() < RECENT {
            return skip(self.id(), "fewer than 5 nights");
        }

        let recent: Vec<f64> = trailing(sessions, RECENT)
            .iter()
            .filter_map(SessionRecord::ahi_value)
            .collect();
        if recent.len() < MIN_READINGS {
            return skip(self.id(), "fewer than 3 recent AHI readings");
        }
        if sessions.len() < LOOKBACK {
            return skip(self.id(), "no full baseline before the last 5 nights");
        }

        let peak = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let had_control = back_window(sessions, LOOKBACK, RECENT)
            .iter()
            .filter_map(SessionRecord::ahi_value)
            .any(|ahi| ahi < CONTROLLED_AHI);

        if peak > SPIKE_AHI && had_control {
            vec![Insight::new(
                InsightType::Alert,
                "⚠️ Sudden AHI Increase",
                format!(
                    "Your AHI spiked to {:.1} recently. This sudden change warrants investigation.",
                    peak
                ),
                Confidence::High,
                ClinicalRelevance::High,
                8,
            )
            .with_data_point("peak_ahi", peak)
            .with_next_steps(&[
                "Review recent changes (weight, medications, sleep position)",
                "Check equipment for malfunction",
                "Contact sleep specialist if pattern continues",
                "Monitor for next 3 nights",
            ])]
        } else {
            vec![]
        }
    }
}
