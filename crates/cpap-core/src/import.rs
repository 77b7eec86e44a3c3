//! Session importers for device exports (JSON arrays and CSV)

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{numeric, SessionRecord};
use crate::quality::{self, round1};

/// Formats tried when no configuration is supplied
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y-%m-%dT%H:%M:%S"];

/// How raw exports are interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// chrono format strings, tried in order
    pub date_formats: Vec<String>,
    /// Score nights that arrive without a quality score
    pub compute_missing_quality: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            compute_missing_quality: true,
        }
    }
}

/// Parse a JSON array of session objects
///
/// Anything other than an array of objects is rejected outright. Objects
/// whose date is missing or unreadable are dropped with a warning; every
/// other field is lenient.
pub fn parse_json(content: &str, options: &ImportOptions) -> Result<Vec<SessionRecord>> {
    let items = match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => items,
        other => {
            return Err(Error::InputKind(format!(
                "expected an array of session records, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut sessions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(Error::InputKind(format!(
                "session {} is {}, not an object",
                index,
                kind_of(item)
            )));
        };

        let raw_date = fields.get("date").and_then(Value::as_str).unwrap_or_default();
        let Some(date) = parse_date(raw_date, options) else {
            warn!(index, date = raw_date, "Skipping session with unreadable date");
            continue;
        };

        sessions.push(build_record(date, |name| json_field(fields, name), options));
    }

    debug!("Parsed {} sessions from JSON", sessions.len());
    Ok(sessions)
}

/// Parse a CSV export with a header row
///
/// Columns are matched by (case-insensitive) header name; unknown columns are
/// ignored and unreadable cells become missing values.
pub fn parse_csv<R: Read>(reader: R, options: &ImportOptions) -> Result<Vec<SessionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_ascii_lowercase(), i))
        .collect();
    let date_column = *columns
        .get("date")
        .ok_or_else(|| Error::Import("Missing date column".into()))?;

    let mut sessions = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;

        let raw_date = record.get(date_column).unwrap_or_default();
        let Some(date) = parse_date(raw_date, options) else {
            warn!(row = line + 1, date = raw_date, "Skipping row with unreadable date");
            continue;
        };

        let cell = |name: &str| {
            columns
                .get(name)
                .and_then(|i| record.get(*i))
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        sessions.push(build_record(date, cell, options));
    }

    debug!("Parsed {} sessions from CSV", sessions.len());
    Ok(sessions)
}

/// Load sessions from a file, choosing the parser by extension
/// (`.json`, anything else is read as CSV)
pub fn load_sessions(path: &Path, options: &ImportOptions) -> Result<Vec<SessionRecord>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let sessions = if is_json {
        parse_json(&fs::read_to_string(path)?, options)?
    } else {
        parse_csv(fs::File::open(path)?, options)?
    };

    debug!(path = %path.display(), count = sessions.len(), "Loaded sessions");
    Ok(sessions)
}

/// Assemble a record from a field lookup, applying column aliases
///
/// A missing quality score is computed before minutes are rounded to hours,
/// so the score sees the exact usage.
fn build_record<F>(date: NaiveDate, field: F, options: &ImportOptions) -> SessionRecord
where
    F: Fn(&str) -> Option<f64>,
{
    let hours = field("duration_hours");
    let minutes_as_hours = field("duration_minutes").map(|m| m / 60.0);

    let mut record = SessionRecord {
        duration_hours: hours.or(minutes_as_hours.map(round1)),
        ahi: field("ahi"),
        mask_leak: field("mask_leak").or_else(|| field("mask_leak_95")),
        pressure_avg: field("pressure_avg"),
        quality_score: field("quality_score"),
        central_apneas: field("central_apneas").and_then(count),
        obstructive_apneas: field("obstructive_apneas").and_then(count),
        hypopneas: field("hypopneas").and_then(count),
        ..SessionRecord::new(date)
    };

    if options.compute_missing_quality && record.recorded_quality().is_none() {
        record.quality_score =
            quality::quality_score(record.ahi, hours.or(minutes_as_hours), record.mask_leak);
    }
    record
}

fn json_field(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    fields.get(name).and_then(numeric)
}

fn count(value: f64) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64).then_some(value as u32)
}

/// Parse a date with the configured formats; datetime formats keep only the day
fn parse_date(s: &str, options: &ImportOptions) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    options.date_formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
