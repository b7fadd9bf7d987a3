#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

pub fn at(date: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .expect("valid test date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight")
}

/// A naive microsecond `Datetime` column from `YYYY-MM-DD` strings.
pub fn datetime_column(name: &str, dates: &[Option<&str>]) -> Column {
    let micros: Vec<Option<i64>> = dates
        .iter()
        .map(|date| date.map(|d| at(d).and_utc().timestamp_micros()))
        .collect();
    Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .expect("datetime cast")
        .into()
}

pub fn duration_ms_column(name: &str, millis: &[i64]) -> Column {
    Series::new(name.into(), millis.to_vec())
        .cast(&DataType::Duration(TimeUnit::Milliseconds))
        .expect("duration cast")
        .into()
}

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../vidstats-parser/tests/data")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
