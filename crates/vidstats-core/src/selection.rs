use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use vidstats_parser::columns;

use crate::frame::{int_values, take_rows, text_values};
use crate::joiner::DAYS_PUBLISHED;

pub const CUMULATIVE_VIEWS: &str = "cumulative_views";

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("no video matches '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedVideo {
    pub video_id: String,
    pub video_title: String,
}

/// Finds a video by identifier, falling back to an exact title match.
pub fn resolve_video(videos: &DataFrame, query: &str) -> Result<SelectedVideo, SelectionError> {
    let ids = text_values(videos, columns::VIDEO_ID)?;
    let titles = text_values(videos, columns::VIDEO_TITLE)?;
    let query = query.trim();

    let position = ids
        .iter()
        .position(|id| id.as_deref() == Some(query))
        .or_else(|| titles.iter().position(|title| title.as_deref() == Some(query)))
        .ok_or_else(|| SelectionError::NotFound(query.to_string()))?;

    Ok(SelectedVideo {
        video_id: ids[position].clone().unwrap_or_default(),
        video_title: titles[position].clone().unwrap_or_default(),
    })
}

/// The selected video's joined daily rows for day-offsets `0..=max_day`, ordered by day,
/// with a running `cumulative_views` column for comparison against the cohort curve.
pub fn video_first_days(
    joined: &DataFrame,
    video_id: &str,
    max_day: i64,
) -> Result<DataFrame, SelectionError> {
    let ids = text_values(joined, columns::VIDEO_ID)?;
    let days = int_values(joined, DAYS_PUBLISHED)?;

    let mut rows: Vec<(i64, usize)> = ids
        .iter()
        .zip(&days)
        .enumerate()
        .filter_map(|(idx, (id, day))| match (id.as_deref(), day) {
            (Some(id), Some(day)) if id == video_id && (0..=max_day).contains(day) => {
                Some((*day, idx))
            }
            _ => None,
        })
        .collect();
    rows.sort_by_key(|(day, idx)| (*day, *idx));

    let order: Vec<usize> = rows.into_iter().map(|(_, idx)| idx).collect();
    let selected = take_rows(joined, &order)?
        .lazy()
        .with_column(
            col(columns::VIEWS)
                .cast(DataType::Float64)
                .cum_sum(false)
                .alias(CUMULATIVE_VIEWS),
        )
        .collect()?;
    Ok(selected)
}
