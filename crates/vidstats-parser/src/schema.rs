//! Canonical column naming contract for the channel export tables.

use polars::prelude::DataFrame;

use crate::errors::ParserError;

pub mod columns {
    pub const VIDEO_ID: &str = "video_id";
    pub const VIDEO_TITLE: &str = "video_title";
    pub const VIDEO_PUBLISH_TIME: &str = "video_publish_time";
    pub const COMMENTS_ADDED: &str = "comments_added";
    pub const SHARES: &str = "shares";
    pub const DISLIKES: &str = "dislikes";
    pub const LIKES: &str = "likes";
    pub const SUBSCRIBERS_LOST: &str = "subscribers_lost";
    pub const SUBSCRIBERS_GAINED: &str = "subscribers_gained";
    pub const RPM_USD: &str = "rpm_usd";
    pub const CPM_USD: &str = "cpm_usd";
    pub const AVERAGE_PERCENT_VIEWED: &str = "average_percent_viewed";
    pub const AVERAGE_VIEW_DURATION: &str = "average_view_duration";
    pub const VIEWS: &str = "views";
    pub const WATCH_TIME_HOURS: &str = "watch_time_hours";
    pub const SUBSCRIBERS: &str = "subscribers";
    pub const ESTIMATED_REVENUE_USD: &str = "estimated_revenue_usd";
    pub const IMPRESSIONS: &str = "impressions";
    pub const IMPRESSIONS_CTR_PCT: &str = "impressions_ctr_pct";

    pub const DATE: &str = "date";

    pub const COUNTRY_CODE: &str = "country_code";
    pub const IS_SUBSCRIBED: &str = "is_subscribed";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    Integer,
    Flag,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Export header spellings, compared case-insensitively.
    pub aliases: &'static [&'static str],
    pub required: bool,
}

const fn spec(
    name: &'static str,
    kind: ColumnKind,
    aliases: &'static [&'static str],
    required: bool,
) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        aliases,
        required,
    }
}

/// The aggregate export is positional: these are its columns in export order.
pub const VIDEO_AGGREGATE_COLUMNS: [ColumnSpec; 19] = {
    use columns::*;
    use ColumnKind::*;
    [
        spec(VIDEO_ID, Text, &["Video"], true),
        spec(VIDEO_TITLE, Text, &["Video title"], true),
        spec(VIDEO_PUBLISH_TIME, Text, &["Video publish time"], true),
        spec(COMMENTS_ADDED, Float, &["Comments added"], true),
        spec(SHARES, Float, &["Shares"], true),
        spec(DISLIKES, Float, &["Dislikes"], true),
        spec(LIKES, Float, &["Likes"], true),
        spec(SUBSCRIBERS_LOST, Float, &["Subscribers lost"], true),
        spec(SUBSCRIBERS_GAINED, Float, &["Subscribers gained"], true),
        spec(RPM_USD, Float, &["RPM (USD)"], true),
        spec(CPM_USD, Float, &["CPM (USD)"], true),
        spec(AVERAGE_PERCENT_VIEWED, Float, &["Average percentage viewed (%)"], true),
        spec(AVERAGE_VIEW_DURATION, Text, &["Average view duration"], true),
        spec(VIEWS, Float, &["Views"], true),
        spec(WATCH_TIME_HOURS, Float, &["Watch time (hours)"], true),
        spec(SUBSCRIBERS, Float, &["Subscribers"], true),
        spec(ESTIMATED_REVENUE_USD, Float, &["Your estimated revenue (USD)"], true),
        spec(IMPRESSIONS, Float, &["Impressions"], true),
        spec(
            IMPRESSIONS_CTR_PCT,
            Float,
            &["Impressions click-through rate (%)"],
            true,
        ),
    ]
};

pub const DAILY_PERFORMANCE_COLUMNS: [ColumnSpec; 4] = {
    use columns::*;
    use ColumnKind::*;
    [
        spec(VIDEO_ID, Text, &["External Video ID", "Video ID", "Video"], true),
        spec(VIDEO_TITLE, Text, &["Video Title"], false),
        spec(DATE, Text, &["Date"], true),
        spec(VIEWS, Integer, &["Views"], true),
    ]
};

pub const COUNTRY_SUBSCRIBER_COLUMNS: [ColumnSpec; 4] = {
    use columns::*;
    use ColumnKind::*;
    [
        spec(VIDEO_TITLE, Text, &["Video Title"], true),
        spec(COUNTRY_CODE, Text, &["Country Code", "Country"], true),
        spec(IS_SUBSCRIBED, Flag, &["Is Subscribed", "Subscribed"], true),
        spec(VIEWS, Integer, &["Views"], true),
    ]
};

pub fn video_aggregate_column_names() -> Vec<&'static str> {
    VIDEO_AGGREGATE_COLUMNS.iter().map(|spec| spec.name).collect()
}

/// Ensures a video aggregate frame follows the canonical naming contract.
///
/// Frames that already carry every canonical column pass through untouched. Otherwise the
/// frame must have the export's width and is renamed positionally.
pub fn normalize_video_aggregate(mut df: DataFrame) -> Result<DataFrame, ParserError> {
    const NAME: &str = "SCHEMA_NORMALIZER";

    let canonical = video_aggregate_column_names();
    let present = df.get_column_names();
    if canonical
        .iter()
        .all(|name| present.iter().any(|found| found.as_str() == *name))
    {
        return Ok(df);
    }

    if df.width() != canonical.len() {
        return Err(ParserError::InvalidHeader {
            parser: NAME,
            message: format!(
                "video aggregate table has {} columns, expected {}",
                df.width(),
                canonical.len()
            ),
        });
    }

    df.set_column_names(canonical)
        .map_err(|err| ParserError::Validation {
            parser: NAME,
            message: format!("failed to rename video aggregate columns: {err}"),
        })?;
    Ok(df)
}
