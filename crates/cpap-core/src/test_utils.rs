//! Test utilities for cpap-core
//!
//! Builders for synthetic nightly session series used by unit and
//! integration tests.

use chrono::{Duration, NaiveDate};

use crate::models::SessionRecord;

/// First night of every generated series
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Metric values for one generated night
///
/// Defaults describe an unremarkable night: 7.5 hours, AHI 6, leak 15 L/min,
/// no pressure or quality data. A week of these only trips the compliance
/// and streak rules.
#[derive(Debug, Clone, Copy)]
pub struct SessionSpec {
    pub duration: Option<f64>,
    pub ahi: Option<f64>,
    pub leak: Option<f64>,
    pub pressure: Option<f64>,
    pub quality: Option<f64>,
}

impl Default for SessionSpec {
    fn default() -> Self {
        Self {
            duration: Some(7.5),
            ahi: Some(6.0),
            leak: Some(15.0),
            pressure: None,
            quality: None,
        }
    }
}

impl SessionSpec {
    pub fn duration(mut self, hours: f64) -> Self {
        self.duration = Some(hours);
        self
    }

    pub fn ahi(mut self, ahi: f64) -> Self {
        self.ahi = Some(ahi);
        self
    }

    pub fn leak(mut self, leak: f64) -> Self {
        self.leak = Some(leak);
        self
    }

    pub fn pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn quality(mut self, score: f64) -> Self {
        self.quality = Some(score);
        self
    }

    pub fn no_ahi(mut self) -> Self {
        self.ahi = None;
        self
    }

    pub fn no_leak(mut self) -> Self {
        self.leak = None;
        self
    }

    fn build(self, date: NaiveDate) -> SessionRecord {
        SessionRecord {
            duration_hours: self.duration,
            ahi: self.ahi,
            mask_leak: self.leak,
            pressure_avg: self.pressure,
            quality_score: self.quality,
            ..SessionRecord::new(date)
        }
    }
}

/// `n` consecutive nights with identical metrics
pub fn nightly(n: usize, spec: SessionSpec) -> Vec<SessionRecord> {
    series(n, |_| spec)
}

/// `n` consecutive nights, metrics chosen per night index (0 = oldest)
pub fn series<F>(n: usize, mut f: F) -> Vec<SessionRecord>
where
    F: FnMut(usize) -> SessionSpec,
{
    (0..n)
        .map(|i| f(i).build(start_date() + Duration::days(i as i64)))
        .collect()
}
