use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use vidstats_parser::columns;

use crate::benchmark::{window_cutoff, BenchmarkError};
use crate::frame::{float_values, int_values};
use crate::joiner::DAYS_PUBLISHED;
use crate::stats::{group_aggregate, Aggregator};
use crate::temporal::to_micros;

pub const MEAN_VIEWS: &str = "mean_views";
pub const MEDIAN_VIEWS: &str = "median_views";
pub const PCT20_VIEWS: &str = "pct20_views";
pub const PCT80_VIEWS: &str = "pct80_views";

const LOW_PERCENTILE: f64 = 20.0;
const HIGH_PERCENTILE: f64 = 80.0;

#[derive(Debug, Error)]
pub enum CohortError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Window(#[from] BenchmarkError),
    #[error("aggregation for day {day} produced no {statistic}")]
    EmptyGroup { day: i64, statistic: &'static str },
}

/// One day-offset of the cohort curve. `mean_views` is the per-day mean; the median and
/// percentile bands are cumulative over ascending day-offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortCurvePoint {
    pub days_published: i64,
    pub mean_views: f64,
    pub median_views: f64,
    pub pct20_views: f64,
    pub pct80_views: f64,
}

#[derive(Debug, Clone)]
pub struct CohortCurve {
    pub cohort_cutoff: NaiveDateTime,
    pub max_day: i64,
    pub points: Vec<CohortCurvePoint>,
}

impl CohortCurve {
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        df![
            DAYS_PUBLISHED => self.points.iter().map(|p| p.days_published).collect::<Vec<_>>(),
            MEAN_VIEWS => self.points.iter().map(|p| p.mean_views).collect::<Vec<_>>(),
            MEDIAN_VIEWS => self.points.iter().map(|p| p.median_views).collect::<Vec<_>>(),
            PCT20_VIEWS => self.points.iter().map(|p| p.pct20_views).collect::<Vec<_>>(),
            PCT80_VIEWS => self.points.iter().map(|p| p.pct80_views).collect::<Vec<_>>()
        ]
    }

    pub fn point(&self, day: i64) -> Option<&CohortCurvePoint> {
        self.points.iter().find(|point| point.days_published == day)
    }
}

/// Builds the views-by-day-since-publish curve for videos published within the trailing
/// `window_months` of `reference`, over day-offsets `0..=max_day`.
///
/// Expects the output of [`crate::joiner::join_publish_dates`]. Day-offsets without rows
/// are absent from the result.
pub fn build_cohort_curve(
    joined: &DataFrame,
    reference: NaiveDateTime,
    window_months: u32,
    max_day: i64,
) -> Result<CohortCurve, CohortError> {
    let cohort_cutoff = window_cutoff(reference, window_months)?;
    let cutoff_micros = to_micros(cohort_cutoff);

    let cohort = joined
        .clone()
        .lazy()
        .filter(
            col(columns::VIDEO_PUBLISH_TIME)
                .cast(DataType::Int64)
                .gt_eq(lit(cutoff_micros))
                .and(col(DAYS_PUBLISHED).gt_eq(lit(0i64)))
                .and(col(DAYS_PUBLISHED).lt_eq(lit(max_day)))
                .and(col(columns::VIEWS).is_not_null()),
        )
        .select([
            col(DAYS_PUBLISHED),
            col(columns::VIEWS).cast(DataType::Float64),
        ])
        .collect()?;

    let aggregators = [
        (MEAN_VIEWS, Aggregator::Mean),
        (MEDIAN_VIEWS, Aggregator::Median),
        (PCT20_VIEWS, Aggregator::Percentile(LOW_PERCENTILE)),
        (PCT80_VIEWS, Aggregator::Percentile(HIGH_PERCENTILE)),
    ];
    let curve = group_aggregate(&cohort, DAYS_PUBLISHED, columns::VIEWS, &aggregators)?
        .lazy()
        .with_columns([
            col(MEDIAN_VIEWS).cum_sum(false),
            col(PCT20_VIEWS).cum_sum(false),
            col(PCT80_VIEWS).cum_sum(false),
        ])
        .collect()?;

    let days = int_values(&curve, DAYS_PUBLISHED)?;
    let means = float_values(&curve, MEAN_VIEWS)?;
    let medians = float_values(&curve, MEDIAN_VIEWS)?;
    let lows = float_values(&curve, PCT20_VIEWS)?;
    let highs = float_values(&curve, PCT80_VIEWS)?;

    let statistic = |day: i64, value: Option<f64>, name: &'static str| {
        value.ok_or(CohortError::EmptyGroup {
            day,
            statistic: name,
        })
    };

    let mut points = Vec::with_capacity(curve.height());
    for idx in 0..curve.height() {
        let Some(day) = days[idx] else {
            continue;
        };
        points.push(CohortCurvePoint {
            days_published: day,
            mean_views: statistic(day, means[idx], MEAN_VIEWS)?,
            median_views: statistic(day, medians[idx], MEDIAN_VIEWS)?,
            pct20_views: statistic(day, lows[idx], PCT20_VIEWS)?,
            pct80_views: statistic(day, highs[idx], PCT80_VIEWS)?,
        });
    }

    debug!(
        cohort_rows = cohort.height(),
        days = points.len(),
        cutoff = %cohort_cutoff,
        "built cohort curve"
    );

    Ok(CohortCurve {
        cohort_cutoff,
        max_day,
        points,
    })
}
