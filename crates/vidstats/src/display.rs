use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use polars::prelude::*;
use vidstats_core::cohort::CohortCurve;
use vidstats_core::joiner::{JoinReport, DAYS_PUBLISHED};
use vidstats_core::records::SubscriberCountryRecord;
use vidstats_core::selection::CUMULATIVE_VIEWS;
use vidstats_core::PipelineOutput;

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:+.1}%", v * 100.0))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn benchmark_table(output: &PipelineOutput) -> Table {
    let short = &output.short_benchmark;
    let long = &output.long_benchmark;
    let delta = output.benchmark_delta();

    let mut table = new_table(vec![
        "Metric",
        format!("{}-month median", short.window_months).as_str(),
        format!("{}-month median", long.window_months).as_str(),
        "Change",
    ]);
    for entry in long.summary() {
        let metric = entry.metric.as_str();
        let change = delta
            .iter()
            .find(|entry| entry.metric == metric)
            .and_then(|entry| entry.median);
        table.add_row(vec![
            Cell::new(metric),
            Cell::new(format_value(short.get(metric))),
            Cell::new(format_value(entry.median)),
            Cell::new(format_pct(change)),
        ]);
    }
    table
}

pub fn join_report_table(report: &JoinReport) -> Table {
    let mut table = new_table(vec!["Daily rows", "Count"]);
    table.add_row(vec![Cell::new("input"), Cell::new(report.input_rows)]);
    table.add_row(vec![Cell::new("joined"), Cell::new(report.joined_rows)]);
    table.add_row(vec![Cell::new("undated"), Cell::new(report.dropped_undated)]);
    table.add_row(vec![Cell::new("unmatched"), Cell::new(report.dropped_unmatched)]);
    table.add_row(vec![
        Cell::new("before publish"),
        Cell::new(report.negative_offsets),
    ]);
    if report.duplicate_video_ids > 0 {
        table.add_row(vec![
            Cell::new("duplicate video ids"),
            Cell::new(report.duplicate_video_ids),
        ]);
    }
    table
}

pub fn audience_table(records: &[SubscriberCountryRecord]) -> Table {
    let mut table = new_table(vec!["Country", "Code", "Subscribed", "Views"]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.country),
            Cell::new(record.country_code.as_deref().unwrap_or("-")),
            Cell::new(record.is_subscribed.map_or("-", |s| if s { "yes" } else { "no" })),
            Cell::new(record.views.map_or_else(|| "-".to_string(), |v| v.to_string())),
        ]);
    }
    table
}

/// The video's cumulative views next to the cohort's cumulative bands for the same day.
pub fn first_days_table(first_days: &DataFrame, curve: &CohortCurve) -> Result<Table> {
    let days = first_days.column(DAYS_PUBLISHED)?.i64()?;
    let cumulative = first_days.column(CUMULATIVE_VIEWS)?.f64()?;

    let mut table = new_table(vec![
        "Day",
        "Cumulative views",
        "Cohort p20",
        "Cohort median",
        "Cohort p80",
    ]);
    for (day, views) in days.into_iter().zip(cumulative) {
        let Some(day) = day else { continue };
        let point = curve.point(day);
        table.add_row(vec![
            Cell::new(day),
            Cell::new(format_value(views)),
            Cell::new(format_value(point.map(|p| p.pct20_views))),
            Cell::new(format_value(point.map(|p| p.median_views))),
            Cell::new(format_value(point.map(|p| p.pct80_views))),
        ]);
    }
    Ok(table)
}
