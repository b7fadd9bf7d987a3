use polars::prelude::*;
use thiserror::Error;
use tracing::debug;
use vidstats_parser::columns;

use crate::frame::{float_values, int_values};

pub const AVG_DURATION_SEC: &str = "avg_duration_sec";
pub const ENGAGEMENT_RATIO: &str = "engagement_ratio";
pub const VIEWS_PER_SUBSCRIBER_GAINED: &str = "views_per_subscriber_gained";

#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Appends the per-video derived fields to a temporally parsed video aggregate frame.
///
/// Ratios with a zero or missing denominator are null rather than zero or infinite.
pub fn derive_metrics(df: &DataFrame) -> Result<DataFrame, DeriveError> {
    let len = df.height();

    // Durations are stored in milliseconds.
    let duration_ms = int_values(df, columns::AVERAGE_VIEW_DURATION)?;
    let comments = float_values(df, columns::COMMENTS_ADDED)?;
    let shares = float_values(df, columns::SHARES)?;
    let dislikes = float_values(df, columns::DISLIKES)?;
    let likes = float_values(df, columns::LIKES)?;
    let views = float_values(df, columns::VIEWS)?;
    let subscribers_gained = float_values(df, columns::SUBSCRIBERS_GAINED)?;

    let mut duration_sec = Vec::with_capacity(len);
    let mut engagement = Vec::with_capacity(len);
    let mut views_per_sub = Vec::with_capacity(len);

    for idx in 0..len {
        duration_sec.push(duration_ms[idx].map(|ms| ms / 1_000));

        let interactions = match (comments[idx], shares[idx], dislikes[idx], likes[idx]) {
            (Some(c), Some(s), Some(d), Some(l)) => Some(c + s + d + l),
            _ => None,
        };
        engagement.push(ratio(interactions, views[idx]));
        views_per_sub.push(ratio(views[idx], subscribers_gained[idx]));
    }

    let undefined_engagement = engagement.iter().filter(|v| v.is_none()).count();
    let undefined_views_per_sub = views_per_sub.iter().filter(|v| v.is_none()).count();
    debug!(
        rows = len,
        undefined_engagement, undefined_views_per_sub, "derived per-video metrics"
    );

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new(AVG_DURATION_SEC.into(), duration_sec).into(),
        Series::new(ENGAGEMENT_RATIO.into(), engagement).into(),
        Series::new(VIEWS_PER_SUBSCRIBER_GAINED.into(), views_per_sub).into(),
    ])?;

    Ok(output)
}

/// `numerator / denominator`, undefined when either side is missing or the denominator is 0.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}
