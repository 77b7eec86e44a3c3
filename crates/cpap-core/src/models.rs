//! Domain models for cpap-core

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::quality;

/// Nightly usage at or above this many hours counts as compliant
pub const COMPLIANT_HOURS: f64 = 4.0;

/// One night of therapy as recorded by the device
///
/// Numeric fields are optional: absent, `null`, or non-numeric values
/// deserialize to `None` and are left out of every statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration_hours: Option<f64>,
    /// Apnea-hypopnea events per hour
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ahi: Option<f64>,
    /// L/min
    #[serde(default, deserialize_with = "lenient_f64")]
    pub mask_leak: Option<f64>,
    /// cmH2O
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pressure_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quality_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub central_apneas: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub obstructive_apneas: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub hypopneas: Option<u32>,
}

impl SessionRecord {
    /// Empty record for a night; fill in with the `with_*` methods
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            duration_hours: None,
            ahi: None,
            mask_leak: None,
            pressure_avg: None,
            quality_score: None,
            central_apneas: None,
            obstructive_apneas: None,
            hypopneas: None,
        }
    }

    pub fn with_duration(mut self, hours: f64) -> Self {
        self.duration_hours = Some(hours);
        self
    }

    pub fn with_ahi(mut self, ahi: f64) -> Self {
        self.ahi = Some(ahi);
        self
    }

    pub fn with_leak(mut self, leak: f64) -> Self {
        self.mask_leak = Some(leak);
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure_avg = Some(pressure);
        self
    }

    pub fn with_quality(mut self, score: f64) -> Self {
        self.quality_score = Some(score);
        self
    }

    pub fn with_events(mut self, central: u32, obstructive: u32, hypopneas: u32) -> Self {
        self.central_apneas = Some(central);
        self.obstructive_apneas = Some(obstructive);
        self.hypopneas = Some(hypopneas);
        self
    }

    /// Quality score derived from this night's AHI, duration and leak
    pub fn computed_quality_score(&self) -> Option<f64> {
        quality::quality_score(self.ahi, self.duration_hours, self.mask_leak)
    }

    /// Fill a missing quality score from the calculator; a recorded score is kept
    pub fn with_computed_quality(mut self) -> Self {
        if self.recorded_quality().is_none() {
            self.quality_score = self.computed_quality_score();
        }
        self
    }

    /// Sum of the recorded event counts (display only)
    pub fn total_events(&self) -> Option<u32> {
        let counts = [self.central_apneas, self.obstructive_apneas, self.hypopneas];
        if counts.iter().all(Option::is_none) {
            return None;
        }
        Some(counts.iter().flatten().sum())
    }

    /// Recorded AHI, zero included
    pub fn ahi_value(&self) -> Option<f64> {
        finite(self.ahi)
    }

    /// Recorded leak, zero included
    pub fn leak_value(&self) -> Option<f64> {
        finite(self.mask_leak)
    }

    /// Usage hours, ignoring nights with no recorded usage
    pub fn recorded_duration(&self) -> Option<f64> {
        nonzero(self.duration_hours)
    }

    /// Quality score, ignoring unscored (zero) nights
    pub fn recorded_quality(&self) -> Option<f64> {
        nonzero(self.quality_score)
    }

    /// Average pressure, ignoring nights with no pressure data
    pub fn recorded_pressure(&self) -> Option<f64> {
        nonzero(self.pressure_avg)
    }

    /// Whether usage met the compliance cutoff; missing usage is not compliant
    pub fn is_compliant(&self) -> bool {
        finite(self.duration_hours).is_some_and(|h| h >= COMPLIANT_HOURS)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v != 0.0)
}

/// Interpret a loosely typed JSON value as a number
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(numeric))
}

fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(numeric)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32))
}
