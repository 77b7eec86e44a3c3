//! Compliance Trend Rule
//!
//! Looks at the last week of usage: how many nights met the 4-hour cutoff
//! and how long the average night was.

use crate::models::{SessionRecord, COMPLIANT_HOURS};
use crate::stats::mean;

use super::engine::{skip, trailing, InsightRule};
use super::types::{ClinicalRelevance, Confidence, Insight, InsightType, RuleId};

const WINDOW: usize = 7;

/// Weekly compliance rate and average usage
pub struct ComplianceTrendRule;

impl InsightRule for ComplianceTrendRule {
    fn id(&self) -> RuleId {
        RuleId::ComplianceTrend
    }

    fn name(&self) -> &'static str {
        "Compliance Trend"
    }

    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.len() < WINDOW {
            return skip(self.id(), "fewer than 7 nights");
        }

        let hours: Vec<f64> = trailing(sessions, WINDOW)
            .iter()
            .filter_map(SessionRecord::recorded_duration)
            .collect();
        let Some(avg_hours) = mean(&hours) else {
            return skip(self.id(), "no usage recorded this week");
        };

        let compliant = hours.iter().filter(|h| **h >= COMPLIANT_HOURS).count();
        let rate = compliant as f64 / hours.len() as f64 * 100.0;

        let mut insights = Vec::new();

        if rate >= 85.0 {
            if avg_hours >= 7.0 {
                insights.push(
                    Insight::new(
                        InsightType::Achievement,
                        "🏆 Excellent Compliance",
                        format!(
                            "Outstanding! You've averaged {:.1} hours nightly this week with {:.0}% compliance. You're in the top 15% of CPAP users.",
                            avg_hours, rate
                        ),
                        Confidence::High,
                        ClinicalRelevance::High,
                        5,
                    )
                    .informational()
                    .with_data_point("avg_hours", avg_hours)
                    .with_data_point("compliance_rate", rate),
                );
            } else {
                insights.push(
                    Insight::new(
                        InsightType::Improvement,
                        "📈 Great Progress",
                        format!(
                            "You're consistently using your CPAP ({:.0}% compliance) but averaging {:.1} hours. Try extending by 30 minutes each night.",
                            rate, avg_hours
                        ),
                        Confidence::High,
                        ClinicalRelevance::Medium,
                        3,
                    )
                    .with_data_point("avg_hours", avg_hours)
                    .with_data_point("compliance_rate", rate)
                    .with_next_steps(&[
                        "Set bedtime 30 minutes earlier",
                        "Use sleep hygiene techniques",
                        "Check comfort settings",
                    ]),
                );
            }
        } else if rate < 50.0 {
            insights.push(
                Insight::new(
                    InsightType::Concern,
                    "⚠️ Compliance Below Target",
                    format!(
                        "Your therapy usage is {:.0}% this week. Insurance requires 70% compliance for coverage. Let's identify barriers.",
                        rate
                    ),
                    Confidence::High,
                    ClinicalRelevance::High,
                    10,
                )
                .with_data_point("compliance_rate", rate)
                .with_next_steps(&[
                    "Review mask fit and comfort",
                    "Check for air leaks",
                    "Consult your sleep specialist",
                    "Consider mask replacement",
                ]),
            );
        }

        insights
    }
}
