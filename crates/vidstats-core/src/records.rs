//! Typed views over the pipeline's frames.
//!
//! Frames stay the working representation between stages; these records are what callers
//! hold onto afterwards. Construction fails on a missing column or a null in a field that
//! the earlier stages guarantee to be present.

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use vidstats_parser::columns;

use crate::audience::COUNTRY;
use crate::deriver::{AVG_DURATION_SEC, ENGAGEMENT_RATIO, VIEWS_PER_SUBSCRIBER_GAINED};
use crate::frame::{flag_values, float_values, int_values, metric_column_names, text_values};
use crate::joiner::DAYS_PUBLISHED;
use crate::temporal::from_micros;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },
    #[error("row {row}: column '{column}' holds an out-of-range timestamp")]
    InvalidTimestamp { row: usize, column: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetricRecord {
    pub video_id: String,
    pub video_title: String,
    pub publish_time: NaiveDateTime,
    pub comments_added: Option<f64>,
    pub shares: Option<f64>,
    pub dislikes: Option<f64>,
    pub likes: Option<f64>,
    pub subscribers_lost: Option<f64>,
    pub subscribers_gained: Option<f64>,
    pub rpm_usd: Option<f64>,
    pub cpm_usd: Option<f64>,
    pub average_percent_viewed: Option<f64>,
    pub average_view_duration_ms: i64,
    pub views: Option<f64>,
    pub watch_time_hours: Option<f64>,
    pub subscribers: Option<f64>,
    pub estimated_revenue_usd: Option<f64>,
    pub impressions: Option<f64>,
    pub impressions_ctr_pct: Option<f64>,
    pub avg_duration_sec: i64,
    pub engagement_ratio: Option<f64>,
    pub views_per_subscriber_gained: Option<f64>,
}

impl VideoMetricRecord {
    /// One record per row of a derived video metric frame, in frame order.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, RecordError> {
        let ids = text_values(df, columns::VIDEO_ID)?;
        let titles = text_values(df, columns::VIDEO_TITLE)?;
        let publish = int_values(df, columns::VIDEO_PUBLISH_TIME)?;
        let duration_ms = int_values(df, columns::AVERAGE_VIEW_DURATION)?;
        let duration_sec = int_values(df, AVG_DURATION_SEC)?;

        let comments = float_values(df, columns::COMMENTS_ADDED)?;
        let shares = float_values(df, columns::SHARES)?;
        let dislikes = float_values(df, columns::DISLIKES)?;
        let likes = float_values(df, columns::LIKES)?;
        let subs_lost = float_values(df, columns::SUBSCRIBERS_LOST)?;
        let subs_gained = float_values(df, columns::SUBSCRIBERS_GAINED)?;
        let rpm = float_values(df, columns::RPM_USD)?;
        let cpm = float_values(df, columns::CPM_USD)?;
        let pct_viewed = float_values(df, columns::AVERAGE_PERCENT_VIEWED)?;
        let views = float_values(df, columns::VIEWS)?;
        let watch_time = float_values(df, columns::WATCH_TIME_HOURS)?;
        let subscribers = float_values(df, columns::SUBSCRIBERS)?;
        let revenue = float_values(df, columns::ESTIMATED_REVENUE_USD)?;
        let impressions = float_values(df, columns::IMPRESSIONS)?;
        let ctr = float_values(df, columns::IMPRESSIONS_CTR_PCT)?;
        let engagement = float_values(df, ENGAGEMENT_RATIO)?;
        let views_per_sub = float_values(df, VIEWS_PER_SUBSCRIBER_GAINED)?;

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            records.push(Self {
                video_id: required(ids[row].clone(), row, columns::VIDEO_ID)?,
                video_title: required(titles[row].clone(), row, columns::VIDEO_TITLE)?,
                publish_time: timestamp(publish[row], row, columns::VIDEO_PUBLISH_TIME)?,
                comments_added: comments[row],
                shares: shares[row],
                dislikes: dislikes[row],
                likes: likes[row],
                subscribers_lost: subs_lost[row],
                subscribers_gained: subs_gained[row],
                rpm_usd: rpm[row],
                cpm_usd: cpm[row],
                average_percent_viewed: pct_viewed[row],
                average_view_duration_ms: required(
                    duration_ms[row],
                    row,
                    columns::AVERAGE_VIEW_DURATION,
                )?,
                views: views[row],
                watch_time_hours: watch_time[row],
                subscribers: subscribers[row],
                estimated_revenue_usd: revenue[row],
                impressions: impressions[row],
                impressions_ctr_pct: ctr[row],
                avg_duration_sec: required(duration_sec[row], row, AVG_DURATION_SEC)?,
                engagement_ratio: engagement[row],
                views_per_subscriber_gained: views_per_sub[row],
            });
        }
        Ok(records)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub metric: String,
    pub value: Option<f64>,
}

/// A video's metrics expressed as deviations from the long-window medians.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedVideoMetricRecord {
    pub video_id: String,
    pub video_title: String,
    pub publish_time: NaiveDateTime,
    pub deviations: Vec<MetricValue>,
}

impl NormalizedVideoMetricRecord {
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, RecordError> {
        let ids = text_values(df, columns::VIDEO_ID)?;
        let titles = text_values(df, columns::VIDEO_TITLE)?;
        let publish = int_values(df, columns::VIDEO_PUBLISH_TIME)?;

        let metrics = metric_column_names(df);
        let mut metric_values = Vec::with_capacity(metrics.len());
        for metric in &metrics {
            metric_values.push(float_values(df, metric)?);
        }

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let deviations = metrics
                .iter()
                .zip(&metric_values)
                .map(|(metric, values)| MetricValue {
                    metric: metric.clone(),
                    value: values[row],
                })
                .collect();
            records.push(Self {
                video_id: required(ids[row].clone(), row, columns::VIDEO_ID)?,
                video_title: required(titles[row].clone(), row, columns::VIDEO_TITLE)?,
                publish_time: timestamp(publish[row], row, columns::VIDEO_PUBLISH_TIME)?,
                deviations,
            });
        }
        Ok(records)
    }

    pub fn deviation(&self, metric: &str) -> Option<f64> {
        self.deviations
            .iter()
            .find(|entry| entry.metric == metric)
            .and_then(|entry| entry.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyViewRecord {
    pub video_id: String,
    pub date: NaiveDateTime,
    pub views: Option<i64>,
    pub publish_time: NaiveDateTime,
    /// Negative when the row predates the publish time.
    pub days_published: i64,
}

impl DailyViewRecord {
    /// Records from a joined daily frame.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, RecordError> {
        let ids = text_values(df, columns::VIDEO_ID)?;
        let dates = int_values(df, columns::DATE)?;
        let views = int_values(df, columns::VIEWS)?;
        let publish = int_values(df, columns::VIDEO_PUBLISH_TIME)?;
        let days = int_values(df, DAYS_PUBLISHED)?;

        (0..df.height())
            .map(|row| {
                Ok(Self {
                    video_id: required(ids[row].clone(), row, columns::VIDEO_ID)?,
                    date: timestamp(dates[row], row, columns::DATE)?,
                    views: views[row],
                    publish_time: timestamp(publish[row], row, columns::VIDEO_PUBLISH_TIME)?,
                    days_published: required(days[row], row, DAYS_PUBLISHED)?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberCountryRecord {
    pub video_title: String,
    pub country_code: Option<String>,
    pub is_subscribed: Option<bool>,
    pub views: Option<i64>,
    pub country: String,
}

impl SubscriberCountryRecord {
    /// Records from a classified audience frame.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>, RecordError> {
        let titles = text_values(df, columns::VIDEO_TITLE)?;
        let codes = text_values(df, columns::COUNTRY_CODE)?;
        let flags = flag_values(df, columns::IS_SUBSCRIBED)?;
        let views = int_values(df, columns::VIEWS)?;
        let buckets = text_values(df, COUNTRY)?;

        (0..df.height())
            .map(|row| {
                Ok(Self {
                    video_title: required(titles[row].clone(), row, columns::VIDEO_TITLE)?,
                    country_code: codes[row].clone(),
                    is_subscribed: flags[row],
                    views: views[row],
                    country: required(buckets[row].clone(), row, COUNTRY)?,
                })
            })
            .collect()
    }
}

fn required<T>(value: Option<T>, row: usize, column: &'static str) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingValue { row, column })
}

fn timestamp(
    micros: Option<i64>,
    row: usize,
    column: &'static str,
) -> Result<NaiveDateTime, RecordError> {
    from_micros(required(micros, row, column)?)
        .ok_or(RecordError::InvalidTimestamp { row, column })
}
