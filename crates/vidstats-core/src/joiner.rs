use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use vidstats_parser::columns;

use crate::frame::{datetime_series, int_values, take_rows, text_values, MICROS_PER_DAY};

pub const DAYS_PUBLISHED: &str = "days_published";

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Row accounting for a time-series join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub input_rows: usize,
    pub joined_rows: usize,
    pub dropped_undated: usize,
    pub dropped_unmatched: usize,
    /// Joined rows dated before their video's publish time. Kept in the output.
    pub negative_offsets: usize,
    /// Video ids listed more than once in the video table. Their daily rows are joined
    /// once per listing.
    pub duplicate_video_ids: usize,
}

#[derive(Debug, Clone)]
pub struct JoinedSeries {
    pub dataframe: DataFrame,
    pub report: JoinReport,
}

/// Inner-joins the daily view table to the video publish times on `video_id` and adds
/// `video_publish_time` and `days_published` (whole days, floored).
///
/// Expects the daily `date` column already parsed to `Datetime`. Rows without a date or
/// without a matching video are dropped; daily row order is preserved. A video id listed
/// more than once yields one joined row per listing, in video table order.
pub fn join_publish_dates(
    daily: &DataFrame,
    videos: &DataFrame,
) -> Result<JoinedSeries, JoinError> {
    let video_ids = text_values(videos, columns::VIDEO_ID)?;
    let publish_times = int_values(videos, columns::VIDEO_PUBLISH_TIME)?;

    let mut publish_by_id: HashMap<String, Vec<i64>> = HashMap::with_capacity(video_ids.len());
    for (id, publish) in video_ids.into_iter().zip(publish_times) {
        if let (Some(id), Some(publish)) = (id, publish) {
            publish_by_id.entry(id).or_default().push(publish);
        }
    }
    let duplicate_video_ids = publish_by_id
        .values()
        .filter(|listings| listings.len() > 1)
        .count();

    let daily_ids = text_values(daily, columns::VIDEO_ID)?;
    let dates = int_values(daily, columns::DATE)?;

    let mut report = JoinReport {
        input_rows: daily.height(),
        duplicate_video_ids,
        ..JoinReport::default()
    };
    let mut kept = Vec::with_capacity(daily.height());
    let mut publish_column = Vec::with_capacity(daily.height());
    let mut days_column = Vec::with_capacity(daily.height());

    for (idx, (id, date)) in daily_ids.iter().zip(&dates).enumerate() {
        let Some(date) = date else {
            report.dropped_undated += 1;
            continue;
        };
        let Some(listings) = id.as_deref().and_then(|id| publish_by_id.get(id)) else {
            report.dropped_unmatched += 1;
            continue;
        };

        for publish in listings {
            let days = (date - publish).div_euclid(MICROS_PER_DAY);
            if days < 0 {
                report.negative_offsets += 1;
            }

            kept.push(idx);
            publish_column.push(Some(*publish));
            days_column.push(days);
        }
    }
    report.joined_rows = kept.len();

    let mut dataframe = take_rows(daily, &kept)?;
    dataframe.hstack_mut(&mut [
        datetime_series(columns::VIDEO_PUBLISH_TIME, publish_column)?.into(),
        Series::new(DAYS_PUBLISHED.into(), days_column).into(),
    ])?;

    if report.duplicate_video_ids > 0 {
        warn!(
            videos = report.duplicate_video_ids,
            "video ids appear more than once in the video table"
        );
    }
    if report.negative_offsets > 0 {
        warn!(
            rows = report.negative_offsets,
            "daily rows predate their video's publish time"
        );
    }
    info!(
        input_rows = report.input_rows,
        joined_rows = report.joined_rows,
        dropped_undated = report.dropped_undated,
        dropped_unmatched = report.dropped_unmatched,
        "joined daily views to publish dates"
    );

    Ok(JoinedSeries { dataframe, report })
}
