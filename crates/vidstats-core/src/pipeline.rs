use std::cmp::Reverse;

use chrono::NaiveDateTime;
use polars::prelude::DataFrame;
use tracing::info;
use vidstats_parser::{columns, normalize_video_aggregate, ChannelTables};

use crate::audience::{classify_audience, AudienceError};
use crate::benchmark::{compute_benchmark, reference_time, BenchmarkEntry, BenchmarkVector};
use crate::cohort::{build_cohort_curve, CohortCurve};
use crate::config::PipelineConfig;
use crate::deriver::derive_metrics;
use crate::error::Result;
use crate::frame::{int_values, take_rows};
use crate::joiner::{join_publish_dates, JoinedSeries};
use crate::normalize::normalize_metrics;
use crate::records::{
    DailyViewRecord, NormalizedVideoMetricRecord, SubscriberCountryRecord, VideoMetricRecord,
};
use crate::selection::{resolve_video, video_first_days, SelectedVideo};
use crate::temporal::{parse_daily_dates, parse_video_temporal};

/// Everything a run reads: the parsed export tables and the window settings.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub tables: &'a ChannelTables,
    pub config: &'a PipelineConfig,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub reference_time: NaiveDateTime,
    /// Derived per-video metrics, newest publish time first.
    pub video_metrics: DataFrame,
    pub video_records: Vec<VideoMetricRecord>,
    /// Deviations from the long-window medians, same row order as `video_metrics`.
    pub normalized_metrics: DataFrame,
    pub normalized_records: Vec<NormalizedVideoMetricRecord>,
    pub short_benchmark: BenchmarkVector,
    pub long_benchmark: BenchmarkVector,
    pub daily_joined: JoinedSeries,
    pub daily_records: Vec<DailyViewRecord>,
    pub cohort_curve: CohortCurve,
}

impl<'a> PipelineContext<'a> {
    pub fn new(tables: &'a ChannelTables, config: &'a PipelineConfig) -> Self {
        Self { tables, config }
    }

    pub fn run(&self) -> Result<PipelineOutput> {
        self.config.validate()?;

        let videos = normalize_video_aggregate(self.tables.video_aggregate.clone())?;
        let videos = parse_video_temporal(&videos)?;
        let videos = derive_metrics(&videos)?;
        let video_metrics = sort_by_publish_time_desc(&videos)?;
        let video_records = VideoMetricRecord::from_frame(&video_metrics)?;

        let reference = reference_time(&video_metrics)?;
        let short_benchmark =
            compute_benchmark(&video_metrics, reference, self.config.short_window_months)?;
        let long_benchmark =
            compute_benchmark(&video_metrics, reference, self.config.long_window_months)?;

        let normalized_metrics = normalize_metrics(&video_metrics, &long_benchmark)?;
        let normalized_records = NormalizedVideoMetricRecord::from_frame(&normalized_metrics)?;

        let daily = parse_daily_dates(&self.tables.daily_performance)?;
        let daily_joined = join_publish_dates(&daily, &video_metrics)?;
        let daily_records = DailyViewRecord::from_frame(&daily_joined.dataframe)?;
        let cohort_curve = build_cohort_curve(
            &daily_joined.dataframe,
            reference,
            self.config.cohort_window_months,
            self.config.cohort_max_day,
        )?;

        info!(
            videos = video_metrics.height(),
            reference_time = %reference,
            short_sample = short_benchmark.sample_size,
            long_sample = long_benchmark.sample_size,
            joined_rows = daily_joined.report.joined_rows,
            cohort_days = cohort_curve.points.len(),
            "pipeline run complete"
        );

        Ok(PipelineOutput {
            reference_time: reference,
            video_metrics,
            video_records,
            normalized_metrics,
            normalized_records,
            short_benchmark,
            long_benchmark,
            daily_joined,
            daily_records,
            cohort_curve,
        })
    }

    /// Classified country/subscriber rows for one video title.
    pub fn audience(&self, video_title: &str) -> Result<DataFrame> {
        let country = self
            .tables
            .country_subscriber
            .as_ref()
            .ok_or(AudienceError::MissingTable)?;
        Ok(classify_audience(country, video_title)?)
    }

    pub fn audience_records(&self, video_title: &str) -> Result<Vec<SubscriberCountryRecord>> {
        let classified = self.audience(video_title)?;
        Ok(SubscriberCountryRecord::from_frame(&classified)?)
    }
}

impl PipelineOutput {
    /// Short-window medians relative to the long-window medians.
    pub fn benchmark_delta(&self) -> Vec<BenchmarkEntry> {
        self.short_benchmark.relative_change(&self.long_benchmark)
    }

    pub fn resolve_video(&self, query: &str) -> Result<SelectedVideo> {
        Ok(resolve_video(&self.video_metrics, query)?)
    }

    /// The video's first days since publish over the same day range as the cohort curve.
    pub fn video_first_days(&self, video_id: &str) -> Result<DataFrame> {
        Ok(video_first_days(
            &self.daily_joined.dataframe,
            video_id,
            self.cohort_curve.max_day,
        )?)
    }
}

fn sort_by_publish_time_desc(videos: &DataFrame) -> Result<DataFrame> {
    let publish = int_values(videos, columns::VIDEO_PUBLISH_TIME)?;
    let mut order: Vec<usize> = (0..videos.height()).collect();
    order.sort_by_key(|&idx| Reverse(publish[idx]));
    Ok(take_rows(videos, &order)?)
}
