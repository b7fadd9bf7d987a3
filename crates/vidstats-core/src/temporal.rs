//! Parsing of the textual dates and durations carried by the export tables.
//!
//! Publish times and view durations are structurally required, so they use one fixed
//! format and fail loudly. Daily dates come from a looser export and degrade to null.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use vidstats_parser::columns;

use crate::frame::{datetime_series, text_values};

pub const PUBLISH_TIME_FORMAT: &str = "%b %d, %Y";
pub const VIEW_DURATION_FORMAT: &str = "%H:%M:%S";

const DAILY_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%d %b %Y"];
const DAILY_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Error)]
pub enum TemporalError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("row {row}: publish time '{value}' does not match '%b %d, %Y'")]
    InvalidPublishTime { row: usize, value: String },
    #[error("row {row}: view duration '{value}' does not match '%H:%M:%S'")]
    InvalidViewDuration { row: usize, value: String },
    #[error("row {row}: required column '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },
}

pub fn parse_publish_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), PUBLISH_TIME_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses an `H:M:S` duration and returns it in milliseconds.
pub fn parse_view_duration(value: &str) -> Option<i64> {
    NaiveTime::parse_from_str(value.trim(), VIEW_DURATION_FORMAT)
        .ok()
        .map(|time| i64::from(time.num_seconds_from_midnight()) * 1_000)
}

/// Lenient daily date parsing; anything unrecognised is `None`.
pub fn parse_daily_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for fmt in DAILY_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DAILY_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

pub(crate) fn to_micros(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// Replaces the textual publish time and view duration columns of the video aggregate
/// table with `Datetime` and `Duration` columns.
pub fn parse_video_temporal(df: &DataFrame) -> Result<DataFrame, TemporalError> {
    let publish_raw = text_values(df, columns::VIDEO_PUBLISH_TIME)?;
    let duration_raw = text_values(df, columns::AVERAGE_VIEW_DURATION)?;

    let mut publish = Vec::with_capacity(df.height());
    for (row, value) in publish_raw.iter().enumerate() {
        let value = value.as_deref().ok_or(TemporalError::MissingValue {
            row,
            column: columns::VIDEO_PUBLISH_TIME,
        })?;
        let parsed = parse_publish_time(value).ok_or_else(|| TemporalError::InvalidPublishTime {
            row,
            value: value.to_string(),
        })?;
        publish.push(Some(to_micros(parsed)));
    }

    let mut durations = Vec::with_capacity(df.height());
    for (row, value) in duration_raw.iter().enumerate() {
        let value = value.as_deref().ok_or(TemporalError::MissingValue {
            row,
            column: columns::AVERAGE_VIEW_DURATION,
        })?;
        let parsed =
            parse_view_duration(value).ok_or_else(|| TemporalError::InvalidViewDuration {
                row,
                value: value.to_string(),
            })?;
        durations.push(parsed);
    }

    let duration_series = Series::new(columns::AVERAGE_VIEW_DURATION.into(), durations)
        .cast(&DataType::Duration(TimeUnit::Milliseconds))?;

    let mut output = df.clone();
    output.with_column(datetime_series(columns::VIDEO_PUBLISH_TIME, publish)?)?;
    output.with_column(duration_series)?;

    debug!(rows = output.height(), "parsed video publish times and durations");
    Ok(output)
}

/// Replaces the textual `date` column of the daily table with a `Datetime` column.
/// Unparsable dates become null and are counted, not reported as errors.
pub fn parse_daily_dates(df: &DataFrame) -> Result<DataFrame, TemporalError> {
    let raw = text_values(df, columns::DATE)?;

    let mut unparsable = 0usize;
    let parsed: Vec<Option<i64>> = raw
        .iter()
        .map(|value| {
            let parsed = value.as_deref().and_then(parse_daily_date).map(to_micros);
            if parsed.is_none() {
                unparsable += 1;
            }
            parsed
        })
        .collect();

    if unparsable > 0 {
        warn!(unparsable, "daily rows with unparsable dates will be excluded");
    }

    let mut output = df.clone();
    output.with_column(datetime_series(columns::DATE, parsed)?)?;
    Ok(output)
}
