//! Insight Engine - runs every rule over a session series and ranks the findings

use std::cmp::Ordering;

use crate::models::SessionRecord;

use super::types::{Insight, RuleId};
use super::{
    AhiPatternRule, ComplianceTrendRule, ConcerningPatternRule, EquipmentPerformanceRule,
    MilestonesRule, OptimizationRule, QualityTrendRule, SleepDurationRule,
};

/// Maximum number of insights returned by one analysis
pub const MAX_INSIGHTS: usize = 8;

/// A rule evaluator: a pure function of the date-sorted session series
///
/// Implementations enforce their own minimum-history guard and return an
/// empty vec when the series is too short for them.
pub trait InsightRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> RuleId;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Inspect the series (oldest first) and emit zero or more insights
    fn evaluate(&self, sessions: &[SessionRecord]) -> Vec<Insight>;
}

/// The main insight engine that orchestrates analysis
///
/// Holds only the rule table; every call to [`InsightEngine::analyze`]
/// builds and returns its own accumulator, so one engine can be shared
/// across threads.
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in clinical rules
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(ComplianceTrendRule));
        engine.register(Box::new(AhiPatternRule));
        engine.register(Box::new(QualityTrendRule));
        engine.register(Box::new(EquipmentPerformanceRule));
        engine.register(Box::new(SleepDurationRule));
        engine.register(Box::new(ConcerningPatternRule));
        engine.register(Box::new(MilestonesRule));
        engine.register(Box::new(OptimizationRule));

        engine
    }

    /// Register an additional rule (runs after the built-ins)
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Analyze a session series and return at most [`MAX_INSIGHTS`] findings,
    /// most urgent first
    pub fn analyze(&self, sessions: &[SessionRecord]) -> Vec<Insight> {
        if sessions.is_empty() {
            return vec![];
        }

        let mut sorted = sessions.to_vec();
        sorted.sort_by_key(|s| s.date);

        let mut found = Vec::new();
        for rule in &self.rules {
            let insights = rule.evaluate(&sorted);
            tracing::debug!(
                rule = rule.id().as_str(),
                count = insights.len(),
                "Rule evaluation complete"
            );
            found.extend(insights);
        }

        let total = found.len();
        let ranked = rank(found);
        tracing::info!(
            sessions = sorted.len(),
            found = total,
            returned = ranked.len(),
            "Insight analysis complete"
        );
        ranked
    }

    /// Get list of registered rules
    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

/// Analyze with the built-in rules
pub fn generate_insights(sessions: &[SessionRecord]) -> Vec<Insight> {
    InsightEngine::new().analyze(sessions)
}

/// Stable sort by priority, then high clinical relevance, both descending;
/// keep the top [`MAX_INSIGHTS`]
pub(crate) fn rank(mut insights: Vec<Insight>) -> Vec<Insight> {
    insights.sort_by(compare_urgency);
    insights.truncate(MAX_INSIGHTS);
    insights
}

fn compare_urgency(a: &Insight, b: &Insight) -> Ordering {
    b.priority().cmp(&a.priority()).then_with(|| {
        b.clinical_relevance()
            .is_high()
            .cmp(&a.clinical_relevance().is_high())
    })
}

/// Log a skipped rule at debug level
pub(crate) fn skip(rule: RuleId, reason: &str) -> Vec<Insight> {
    tracing::debug!(rule = rule.as_str(), reason, "Rule skipped");
    vec![]
}

/// The last `n` sessions (all of them if fewer)
pub(crate) fn trailing(sessions: &[SessionRecord], n: usize) -> &[SessionRecord] {
    &sessions[sessions.len().saturating_sub(n)..]
}

/// Sessions from `start_back` nights before the end up to (excluding)
/// `end_back` nights before the end, clipped at the oldest session
pub(crate) fn back_window(
    sessions: &[SessionRecord],
    start_back: usize,
    end_back: usize,
) -> &[SessionRecord] {
    let len = sessions.len();
    let start = len.saturating_sub(start_back);
    let end = len.saturating_sub(end_back).max(start);
    &sessions[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::{ClinicalRelevance, Confidence, InsightType};
    use crate::test_utils::{nightly, series, SessionSpec};

    fn insight(title: &str, priority: u8, relevance: ClinicalRelevance) -> Insight {
        Insight::new(
            InsightType::Trend,
            title,
            "",
            Confidence::High,
            relevance,
            priority,
        )
    }

    struct FixedRule(Vec<Insight>);

    impl InsightRule for FixedRule {
        fn id(&self) -> RuleId {
            RuleId::Optimization
        }

        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn evaluate(&self, _sessions: &[SessionRecord]) -> Vec<Insight> {
            self.0.clone()
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        let ids = engine.rule_ids();

        assert_eq!(ids.len(), 8);
        assert_eq!(ids[0], RuleId::ComplianceTrend);
        assert!(ids.contains(&RuleId::ConcerningPattern));
        assert_eq!(ids[7], RuleId::Optimization);
    }

    #[test]
    fn test_analyze_empty() {
        assert!(InsightEngine::new().analyze(&[]).is_empty());
    }

    #[test]
    fn test_rank_orders_by_priority_then_relevance() {
        let ranked = rank(vec![
            insight("a", 3, ClinicalRelevance::Medium),
            insight("b", 5, ClinicalRelevance::Medium),
            insight("c", 3, ClinicalRelevance::High),
            insight("d", 5, ClinicalRelevance::High),
        ]);
        let titles: Vec<_> = ranked.iter().map(|i| i.title()).collect();
        assert_eq!(titles, ["d", "b", "c", "a"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank(vec![
            insight("first", 4, ClinicalRelevance::Medium),
            insight("second", 4, ClinicalRelevance::Low),
            insight("third", 4, ClinicalRelevance::Medium),
        ]);
        let titles: Vec<_> = ranked.iter().map(|i| i.title()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn test_rank_truncates() {
        let many = (1..=12)
            .map(|p| insight(&p.to_string(), p, ClinicalRelevance::Low))
            .collect();
        let ranked = rank(many);
        assert_eq!(ranked.len(), MAX_INSIGHTS);
        assert_eq!(ranked[0].priority(), 12);
        assert_eq!(ranked[7].priority(), 5);
    }

    #[test]
    fn test_windows() {
        let sessions = nightly(20, SessionSpec::default());
        assert_eq!(trailing(&sessions, 7).len(), 7);
        assert_eq!(trailing(&sessions, 7)[0].date, sessions[13].date);
        assert_eq!(trailing(&sessions[..3], 7).len(), 3);

        let prior = back_window(&sessions, 15, 5);
        assert_eq!(prior.len(), 10);
        assert_eq!(prior[0].date, sessions[5].date);
        assert_eq!(back_window(&sessions[..12], 30, 7).len(), 5);
        assert!(back_window(&sessions[..4], 30, 7).is_empty());
    }

    #[test]
    fn test_registered_rule_participates_in_ranking() {
        let mut engine = InsightEngine::new();
        engine.register(Box::new(FixedRule(vec![insight(
            "custom",
            10,
            ClinicalRelevance::High,
        )])));

        let sessions = nightly(1, SessionSpec::default());
        let insights = engine.analyze(&sessions);
        assert_eq!(insights[0].title(), "custom");
    }

    #[test]
    fn test_analyze_sorts_input_by_date() {
        // Good first week, poor second week; the trailing window must be the
        // second week no matter how the caller ordered the records.
        let sessions = series(14, |i| {
            SessionSpec::default().duration(if i < 7 { 8.0 } else { 2.0 })
        });
        let mut shuffled = sessions.clone();
        shuffled.reverse();
        shuffled.swap(2, 9);

        let insights = InsightEngine::new().analyze(&shuffled);
        assert!(insights
            .iter()
            .any(|i| i.title().contains("Compliance Below Target")));
        assert!(!insights
            .iter()
            .any(|i| i.title().contains("Excellent Compliance")));
    }
}
