mod common;

use polars::prelude::*;
use vidstats_core::joiner::{join_publish_dates, DAYS_PUBLISHED};
use vidstats_parser::columns;

use common::datetime_column;

fn videos() -> DataFrame {
    DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["a", "b"]).into(),
        datetime_column(
            columns::VIDEO_PUBLISH_TIME,
            &[Some("2023-01-01"), Some("2023-02-01")],
        ),
    ])
    .unwrap()
}

fn daily() -> DataFrame {
    DataFrame::new(vec![
        Series::new(
            columns::VIDEO_ID.into(),
            &["b", "a", "x", "a", "b", "a"],
        )
        .into(),
        datetime_column(
            columns::DATE,
            &[
                Some("2023-02-03"),
                Some("2023-01-01"),
                Some("2023-01-05"),
                None,
                Some("2023-01-30"),
                Some("2023-01-11"),
            ],
        ),
        Series::new(columns::VIEWS.into(), &[5i64, 10, 99, 1000, 3, 7]).into(),
    ])
    .unwrap()
}

#[test]
fn joins_publish_time_and_day_offsets() -> PolarsResult<()> {
    let joined = join_publish_dates(&daily(), &videos()).expect("join");
    let df = &joined.dataframe;

    assert_eq!(df.height(), 4);
    let ids: Vec<Option<&str>> = df.column(columns::VIDEO_ID)?.str()?.into_iter().collect();
    assert_eq!(ids, vec![Some("b"), Some("a"), Some("b"), Some("a")]);

    let days: Vec<Option<i64>> = df.column(DAYS_PUBLISHED)?.i64()?.into_iter().collect();
    assert_eq!(days, vec![Some(2), Some(0), Some(-2), Some(10)]);

    let views: Vec<Option<i64>> = df.column(columns::VIEWS)?.i64()?.into_iter().collect();
    assert_eq!(views, vec![Some(5), Some(10), Some(3), Some(7)]);

    assert_eq!(
        df.column(columns::VIDEO_PUBLISH_TIME)?.dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );
    Ok(())
}

#[test]
fn report_counts_dropped_and_negative_rows() {
    let joined = join_publish_dates(&daily(), &videos()).expect("join");
    let report = joined.report;

    assert_eq!(report.input_rows, 6);
    assert_eq!(report.joined_rows, 4);
    assert_eq!(report.dropped_undated, 1);
    assert_eq!(report.dropped_unmatched, 1);
    assert_eq!(report.negative_offsets, 1);
    assert_eq!(report.duplicate_video_ids, 0);
}

#[test]
fn unmatched_video_produces_no_rows() -> PolarsResult<()> {
    let daily = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["zzz"]).into(),
        datetime_column(columns::DATE, &[Some("2023-01-05")]),
        Series::new(columns::VIEWS.into(), &[1i64]).into(),
    ])?;

    let joined = join_publish_dates(&daily, &videos()).expect("join");
    assert_eq!(joined.dataframe.height(), 0);
    assert_eq!(joined.report.dropped_unmatched, 1);
    Ok(())
}

#[test]
fn partial_days_are_floored() -> PolarsResult<()> {
    let half_day = 12 * 3_600 * 1_000_000i64;
    let publish = common::at("2023-01-02").and_utc().timestamp_micros();
    let daily = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["a", "a"]).into(),
        Series::new(
            columns::DATE.into(),
            &[publish - half_day, publish + half_day],
        )
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        .into(),
        Series::new(columns::VIEWS.into(), &[1i64, 2]).into(),
    ])?;
    let videos = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["a"]).into(),
        datetime_column(columns::VIDEO_PUBLISH_TIME, &[Some("2023-01-02")]),
    ])?;

    let joined = join_publish_dates(&daily, &videos).expect("join");
    let days: Vec<Option<i64>> = joined
        .dataframe
        .column(DAYS_PUBLISHED)?
        .i64()?
        .into_iter()
        .collect();
    assert_eq!(days, vec![Some(-1), Some(0)]);
    assert_eq!(joined.report.negative_offsets, 1);
    Ok(())
}

#[test]
fn repeated_video_id_joins_once_per_listing() -> PolarsResult<()> {
    let videos = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["a", "b", "a"]).into(),
        datetime_column(
            columns::VIDEO_PUBLISH_TIME,
            &[Some("2023-01-01"), Some("2023-02-01"), Some("2023-01-05")],
        ),
    ])?;
    let daily = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["a", "b"]).into(),
        datetime_column(columns::DATE, &[Some("2023-01-11"), Some("2023-02-02")]),
        Series::new(columns::VIEWS.into(), &[7i64, 3]).into(),
    ])?;

    let joined = join_publish_dates(&daily, &videos).expect("join");
    let df = &joined.dataframe;

    let ids: Vec<Option<&str>> = df.column(columns::VIDEO_ID)?.str()?.into_iter().collect();
    assert_eq!(ids, vec![Some("a"), Some("a"), Some("b")]);
    let days: Vec<Option<i64>> = df.column(DAYS_PUBLISHED)?.i64()?.into_iter().collect();
    assert_eq!(days, vec![Some(10), Some(6), Some(1)]);
    let views: Vec<Option<i64>> = df.column(columns::VIEWS)?.i64()?.into_iter().collect();
    assert_eq!(views, vec![Some(7), Some(7), Some(3)]);

    assert_eq!(joined.report.input_rows, 2);
    assert_eq!(joined.report.joined_rows, 3);
    assert_eq!(joined.report.duplicate_video_ids, 1);
    Ok(())
}
