use chrono::{Months, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use vidstats_parser::columns;

use crate::deriver::{AVG_DURATION_SEC, ENGAGEMENT_RATIO, VIEWS_PER_SUBSCRIBER_GAINED};
use crate::frame::{int_values, metric_column_names, take_rows};
use crate::temporal::{from_micros, to_micros};

/// Headline metrics shown alongside the benchmarks.
pub const SUMMARY_METRICS: [&str; 10] = [
    columns::VIEWS,
    columns::LIKES,
    columns::SUBSCRIBERS,
    columns::SHARES,
    columns::COMMENTS_ADDED,
    columns::RPM_USD,
    columns::AVERAGE_PERCENT_VIEWED,
    AVG_DURATION_SEC,
    ENGAGEMENT_RATIO,
    VIEWS_PER_SUBSCRIBER_GAINED,
];

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("video table has no publish times")]
    EmptyTable,
    #[error("cannot step {months} months back from {reference}")]
    WindowOutOfRange {
        reference: NaiveDateTime,
        months: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkEntry {
    pub metric: String,
    /// `None` when no video in the window has a value for this metric.
    pub median: Option<f64>,
}

/// Per-metric medians over the videos published in a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkVector {
    pub window_months: u32,
    pub reference_time: NaiveDateTime,
    pub cutoff: NaiveDateTime,
    pub sample_size: usize,
    pub entries: Vec<BenchmarkEntry>,
}

impl BenchmarkVector {
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.metric == metric)
            .and_then(|entry| entry.median)
    }

    /// `(self - baseline) / baseline` for every metric of `self`, undefined where the
    /// baseline is missing or zero.
    pub fn relative_change(&self, baseline: &BenchmarkVector) -> Vec<BenchmarkEntry> {
        self.entries
            .iter()
            .map(|entry| BenchmarkEntry {
                metric: entry.metric.clone(),
                median: deviation(entry.median, baseline.get(&entry.metric)),
            })
            .collect()
    }

    pub fn summary(&self) -> Vec<&BenchmarkEntry> {
        SUMMARY_METRICS
            .iter()
            .filter_map(|metric| self.entries.iter().find(|entry| entry.metric == *metric))
            .collect()
    }
}

/// `(value - median) / median`; undefined when either is missing or the median is zero.
pub fn deviation(value: Option<f64>, median: Option<f64>) -> Option<f64> {
    match (value, median) {
        (Some(v), Some(m)) if m != 0.0 => Some((v - m) / m),
        _ => None,
    }
}

/// The latest publish time in the table, used as "now" for every trailing window.
pub fn reference_time(videos: &DataFrame) -> Result<NaiveDateTime, BenchmarkError> {
    int_values(videos, columns::VIDEO_PUBLISH_TIME)?
        .into_iter()
        .flatten()
        .max()
        .and_then(from_micros)
        .ok_or(BenchmarkError::EmptyTable)
}

/// Calendar-month subtraction; the day is clamped to the end of shorter months.
pub fn window_cutoff(
    reference: NaiveDateTime,
    months: u32,
) -> Result<NaiveDateTime, BenchmarkError> {
    reference
        .checked_sub_months(Months::new(months))
        .ok_or(BenchmarkError::WindowOutOfRange { reference, months })
}

/// Row indices of videos published at or after the window cutoff.
pub fn window_rows(
    videos: &DataFrame,
    reference: NaiveDateTime,
    months: u32,
) -> Result<Vec<usize>, BenchmarkError> {
    let cutoff = to_micros(window_cutoff(reference, months)?);
    Ok(int_values(videos, columns::VIDEO_PUBLISH_TIME)?
        .into_iter()
        .enumerate()
        .filter_map(|(idx, publish)| publish.filter(|ts| *ts >= cutoff).map(|_| idx))
        .collect())
}

pub fn compute_benchmark(
    videos: &DataFrame,
    reference: NaiveDateTime,
    months: u32,
) -> Result<BenchmarkVector, BenchmarkError> {
    let cutoff = window_cutoff(reference, months)?;
    let rows = window_rows(videos, reference, months)?;

    let window = take_rows(videos, &rows)?;

    let mut entries = Vec::new();
    for metric in metric_column_names(videos) {
        let median = window
            .column(&metric)?
            .cast(&DataType::Float64)?
            .f64()?
            .median();
        if median.is_none() {
            warn!(metric = %metric, window_months = months, "no values in benchmark window");
        }
        entries.push(BenchmarkEntry { metric, median });
    }

    debug!(
        window_months = months,
        sample_size = rows.len(),
        cutoff = %cutoff,
        "computed benchmark"
    );

    Ok(BenchmarkVector {
        window_months: months,
        reference_time: reference,
        cutoff,
        sample_size: rows.len(),
        entries,
    })
}
