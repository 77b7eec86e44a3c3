//! Therapy summary metrics
//!
//! Compliance and sleep-quality figures over a reporting window, and a
//! side-by-side comparison of two date ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{SessionRecord, COMPLIANT_HOURS};
use crate::stats::{mean, trend, Polarity, TrendDirection};

/// Inclusive range of nights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `None` when `end` precedes `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = String;

    /// Parses `YYYY-MM-DD..YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| format!("Expected <from>..<to>, got: {}", s))?;
        let parse = |d: &str| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|_| format!("Invalid date: {}", d.trim()))
        };
        let (start, end) = (parse(start)?, parse(end)?);
        Self::new(start, end).ok_or_else(|| format!("Range ends before it starts: {}", s))
    }
}

/// Usage against the 4-hour compliance cutoff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceMetrics {
    pub total_nights: usize,
    pub compliant_nights: usize,
    /// Percent of nights in the window that were compliant
    pub compliance_rate: f64,
    /// Mean over nights with recorded usage
    pub average_usage_hours: Option<f64>,
    pub target_hours: f64,
}

impl ComplianceMetrics {
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let compliant_nights = sessions.iter().filter(|s| s.is_compliant()).count();
        let hours: Vec<f64> = sessions
            .iter()
            .filter_map(SessionRecord::recorded_duration)
            .collect();

        Self {
            total_nights: sessions.len(),
            compliant_nights,
            compliance_rate: percent(compliant_nights, sessions.len()),
            average_usage_hours: mean(&hours),
            target_hours: COMPLIANT_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepQualityMetrics {
    pub average_ahi: Option<f64>,
    pub ahi_trend: TrendDirection,
    pub average_leak: Option<f64>,
    pub average_quality: Option<f64>,
}

impl SleepQualityMetrics {
    /// `sessions` must be sorted by date
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let ahis: Vec<f64> = sessions.iter().filter_map(SessionRecord::ahi_value).collect();
        let leaks: Vec<f64> = sessions.iter().filter_map(SessionRecord::leak_value).collect();
        let quality: Vec<f64> = sessions
            .iter()
            .filter_map(SessionRecord::recorded_quality)
            .collect();

        Self {
            average_ahi: mean(&ahis),
            ahi_trend: TrendDirection::classify(trend(&ahis), Polarity::LowerIsBetter),
            average_leak: mean(&leaks),
            average_quality: mean(&quality),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TherapySummary {
    pub period: DateRange,
    pub compliance: ComplianceMetrics,
    pub sleep_quality: SleepQualityMetrics,
}

/// Summarize the `window_days` nights ending at the latest session.
/// `None` for an empty series.
pub fn summarize(sessions: &[SessionRecord], window_days: u32) -> Option<TherapySummary> {
    let end = sessions.iter().map(|s| s.date).max()?;
    let start = end
        .checked_sub_signed(Duration::days(i64::from(window_days.max(1)) - 1))
        .unwrap_or(NaiveDate::MIN);
    let period = DateRange { start, end };

    let window = in_range(sessions, period);
    tracing::debug!(%period, nights = window.len(), "Summarizing window");

    Some(TherapySummary {
        period,
        compliance: ComplianceMetrics::from_sessions(&window),
        sleep_quality: SleepQualityMetrics::from_sessions(&window),
    })
}

/// Headline figures for one period of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodMetrics {
    pub period: DateRange,
    pub nights: usize,
    pub compliance_rate: f64,
    pub average_ahi: Option<f64>,
    pub average_usage_hours: Option<f64>,
}

impl PeriodMetrics {
    fn measure(sessions: &[SessionRecord], period: DateRange) -> Self {
        let window = in_range(sessions, period);
        let compliance = ComplianceMetrics::from_sessions(&window);
        let ahis: Vec<f64> = window.iter().filter_map(SessionRecord::ahi_value).collect();

        Self {
            period,
            nights: window.len(),
            compliance_rate: compliance.compliance_rate,
            average_ahi: mean(&ahis),
            average_usage_hours: compliance.average_usage_hours,
        }
    }
}

/// Two periods side by side; changes are `second - first`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub first: PeriodMetrics,
    pub second: PeriodMetrics,
    pub compliance_rate_change: f64,
    pub ahi_change: Option<f64>,
    pub usage_change: Option<f64>,
}

pub fn compare_periods(
    sessions: &[SessionRecord],
    first: DateRange,
    second: DateRange,
) -> PeriodComparison {
    let first = PeriodMetrics::measure(sessions, first);
    let second = PeriodMetrics::measure(sessions, second);

    PeriodComparison {
        compliance_rate_change: second.compliance_rate - first.compliance_rate,
        ahi_change: delta(first.average_ahi, second.average_ahi),
        usage_change: delta(first.average_usage_hours, second.average_usage_hours),
        first,
        second,
    }
}

fn in_range(sessions: &[SessionRecord], period: DateRange) -> Vec<SessionRecord> {
    let mut window: Vec<SessionRecord> = sessions
        .iter()
        .filter(|s| period.contains(s.date))
        .cloned()
        .collect();
    window.sort_by_key(|s| s.date);
    window
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn delta(first: Option<f64>, second: Option<f64>) -> Option<f64> {
    Some(second? - first?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{nightly, series, start_date, SessionSpec};

    fn range(s: &str) -> DateRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_date_range_parse() {
        let r = range("2025-01-01..2025-01-07");
        assert_eq!(r.days(), 7);
        assert!(r.contains(start_date()));
        assert_eq!(r.to_string(), "2025-01-01..2025-01-07");

        assert!("2025-01-07..2025-01-01".parse::<DateRange>().is_err());
        assert!("2025-01-01".parse::<DateRange>().is_err());
        assert!("2025-01-01..soon".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[], 30).is_none());
    }

    #[test]
    fn test_summarize_window_ends_at_latest_night() {
        // 40 nights: 10 short ones, then 30 good ones
        let sessions = series(40, |i| {
            SessionSpec::default().duration(if i < 10 { 2.0 } else { 8.0 })
        });
        let summary = summarize(&sessions, 30).unwrap();

        assert_eq!(summary.period.end, sessions[39].date);
        assert_eq!(summary.period.start, sessions[10].date);
        assert_eq!(summary.compliance.total_nights, 30);
        assert_eq!(summary.compliance.compliant_nights, 30);
        assert_eq!(summary.compliance.compliance_rate, 100.0);
        assert_eq!(summary.compliance.average_usage_hours, Some(8.0));
        assert_eq!(summary.compliance.target_hours, 4.0);
    }

    #[test]
    fn test_summarize_window_past_calendar_start() {
        let sessions = nightly(3, SessionSpec::default());
        let summary = summarize(&sessions, u32::MAX).unwrap();

        assert_eq!(summary.period.start, NaiveDate::MIN);
        assert_eq!(summary.period.end, sessions[2].date);
        assert_eq!(summary.compliance.total_nights, 3);
    }

    #[test]
    fn test_compliance_counts_missing_usage_as_noncompliant() {
        let mut sessions = nightly(4, SessionSpec::default());
        sessions[0].duration_hours = None;
        sessions[1].duration_hours = Some(3.0);
        let metrics = ComplianceMetrics::from_sessions(&sessions);

        assert_eq!(metrics.compliant_nights, 2);
        assert_eq!(metrics.compliance_rate, 50.0);
        assert_eq!(metrics.average_usage_hours, Some(6.0));
    }

    #[test]
    fn test_sleep_quality_trend() {
        let falling = series(10, |i| SessionSpec::default().ahi(12.0 - i as f64));
        let metrics = SleepQualityMetrics::from_sessions(&falling);
        assert_eq!(metrics.ahi_trend, TrendDirection::Improving);
        assert_eq!(metrics.average_ahi, Some(7.5));
        assert_eq!(metrics.average_leak, Some(15.0));
        assert_eq!(metrics.average_quality, None);

        let flat = nightly(10, SessionSpec::default().quality(80.0));
        let metrics = SleepQualityMetrics::from_sessions(&flat);
        assert_eq!(metrics.ahi_trend, TrendDirection::Stable);
        assert_eq!(metrics.average_quality, Some(80.0));
    }

    #[test]
    fn test_summarize_unsorted_input() {
        let mut sessions = series(10, |i| SessionSpec::default().ahi(2.0 + i as f64));
        sessions.reverse();
        let summary = summarize(&sessions, 30).unwrap();
        assert_eq!(summary.sleep_quality.ahi_trend, TrendDirection::Worsening);
    }

    #[test]
    fn test_compare_periods() {
        let sessions = series(14, |i| {
            if i < 7 {
                SessionSpec::default().duration(3.0).ahi(9.0)
            } else {
                SessionSpec::default().duration(8.0).ahi(4.0)
            }
        });
        let comparison = compare_periods(
            &sessions,
            range("2025-01-01..2025-01-07"),
            range("2025-01-08..2025-01-14"),
        );

        assert_eq!(comparison.first.nights, 7);
        assert_eq!(comparison.first.compliance_rate, 0.0);
        assert_eq!(comparison.second.compliance_rate, 100.0);
        assert_eq!(comparison.compliance_rate_change, 100.0);
        assert_eq!(comparison.ahi_change, Some(-5.0));
        assert_eq!(comparison.usage_change, Some(5.0));
    }

    #[test]
    fn test_compare_empty_period() {
        let sessions = nightly(7, SessionSpec::default());
        let comparison = compare_periods(
            &sessions,
            range("2024-06-01..2024-06-30"),
            range("2025-01-01..2025-01-07"),
        );

        assert_eq!(comparison.first.nights, 0);
        assert_eq!(comparison.first.average_ahi, None);
        assert_eq!(comparison.ahi_change, None);
        assert_eq!(comparison.compliance_rate_change, 100.0);
    }
}
