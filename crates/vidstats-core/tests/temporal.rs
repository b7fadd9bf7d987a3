mod common;

use polars::prelude::*;
use vidstats_core::temporal::{
    parse_daily_date, parse_daily_dates, parse_publish_time, parse_video_temporal,
    parse_view_duration, TemporalError,
};
use vidstats_parser::{columns, normalize_video_aggregate, parse_table_file};

use common::{at, fixture_dir};

#[test]
fn publish_time_uses_month_day_year_format() {
    assert_eq!(parse_publish_time("Jan 1, 2023"), Some(at("2023-01-01")));
    assert_eq!(parse_publish_time(" Nov 15, 2022 "), Some(at("2022-11-15")));
    assert_eq!(parse_publish_time("2023-01-01"), None);
    assert_eq!(parse_publish_time(""), None);
}

#[test]
fn view_duration_is_milliseconds() {
    assert_eq!(parse_view_duration("0:03:20"), Some(200_000));
    assert_eq!(parse_view_duration("01:00:05"), Some(3_605_000));
    assert_eq!(parse_view_duration("3m20s"), None);
}

#[test]
fn daily_dates_accept_the_lenient_forms() {
    let jan2 = at("2023-01-02");
    assert_eq!(parse_daily_date("2023-01-02"), Some(jan2));
    assert_eq!(parse_daily_date("01/02/2023"), Some(jan2));
    assert_eq!(parse_daily_date("Jan 2, 2023"), Some(jan2));
    assert_eq!(parse_daily_date("2 Jan 2023"), Some(jan2));
    assert_eq!(parse_daily_date("2023-01-02 00:00:00"), Some(jan2));
    assert_eq!(parse_daily_date("2023-01-02T00:00:00Z"), Some(jan2));
    assert_eq!(
        parse_daily_date("2023-01-02T06:30:00"),
        jan2.checked_add_signed(chrono::Duration::minutes(390))
    );
    assert_eq!(parse_daily_date("not a date"), None);
    assert_eq!(parse_daily_date("   "), None);
}

#[test]
fn video_temporal_replaces_text_columns() -> PolarsResult<()> {
    let df = df!(
        columns::VIDEO_ID => &["a", "b"],
        columns::VIDEO_PUBLISH_TIME => &["Jan 1, 2023", "Feb 10, 2023"],
        columns::AVERAGE_VIEW_DURATION => &["0:01:00", "0:10:30"]
    )?;

    let parsed = parse_video_temporal(&df).expect("temporal parse");

    assert_eq!(
        parsed.column(columns::VIDEO_PUBLISH_TIME)?.dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );
    assert_eq!(
        parsed.column(columns::AVERAGE_VIEW_DURATION)?.dtype(),
        &DataType::Duration(TimeUnit::Milliseconds)
    );

    let durations = parsed
        .column(columns::AVERAGE_VIEW_DURATION)?
        .cast(&DataType::Int64)?;
    let durations = durations.i64()?;
    assert_eq!(durations.get(0), Some(60_000));
    assert_eq!(durations.get(1), Some(630_000));

    let publish = parsed
        .column(columns::VIDEO_PUBLISH_TIME)?
        .cast(&DataType::Int64)?;
    assert_eq!(
        publish.i64()?.get(1),
        Some(at("2023-02-10").and_utc().timestamp_micros())
    );
    Ok(())
}

#[test]
fn malformed_publish_time_names_row_and_value() -> PolarsResult<()> {
    let df = df!(
        columns::VIDEO_PUBLISH_TIME => &["Jan 1, 2023", "2023-01-02"],
        columns::AVERAGE_VIEW_DURATION => &["0:01:00", "0:01:00"]
    )?;

    match parse_video_temporal(&df) {
        Err(TemporalError::InvalidPublishTime { row, value }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "2023-01-02");
        }
        other => panic!("expected InvalidPublishTime, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_duration_is_fatal() -> PolarsResult<()> {
    let df = df!(
        columns::VIDEO_PUBLISH_TIME => &["Jan 1, 2023"],
        columns::AVERAGE_VIEW_DURATION => &["three minutes"]
    )?;

    let err = parse_video_temporal(&df).unwrap_err();
    assert!(matches!(
        err,
        TemporalError::InvalidViewDuration { row: 0, .. }
    ));
    Ok(())
}

#[test]
fn daily_dates_degrade_to_null() -> PolarsResult<()> {
    let df = df!(
        columns::VIDEO_ID => &["a", "a", "a"],
        columns::DATE => &[Some("2023-01-01"), Some("garbage"), None],
        columns::VIEWS => &[1i64, 2, 3]
    )?;

    let parsed = parse_daily_dates(&df).expect("daily dates never fail on content");
    let dates = parsed.column(columns::DATE)?;

    assert_eq!(parsed.height(), 3);
    assert_eq!(dates.null_count(), 2);
    let micros = dates.cast(&DataType::Int64)?;
    assert_eq!(
        micros.i64()?.get(0),
        Some(common::at("2023-01-01").and_utc().timestamp_micros())
    );
    Ok(())
}

#[test]
fn first_video_without_publish_time_is_reported_missing() {
    let fixture = std::fs::read_to_string(fixture_dir().join("Aggregated_Metrics_By_Video.csv"))
        .expect("fixture");
    let header = fixture.lines().next().expect("header");
    let content = [
        header,
        "vid_x,Unscheduled video,,1,1,0,5,0,1,1.0,2.0,30.0,0:01:00,50,1.0,1,0.1,900,2.0",
        "vid_y,Later video,\"Feb 1, 2023\",2,1,0,6,0,1,1.0,2.0,30.0,0:01:00,60,1.0,1,0.1,900,2.0",
    ]
    .join("\n");

    let parsed = parse_table_file(&content).expect("aggregate parse");
    let videos = normalize_video_aggregate(parsed.df).expect("normalize");

    match parse_video_temporal(&videos) {
        Err(TemporalError::MissingValue { row, column }) => {
            assert_eq!(row, 0);
            assert_eq!(column, columns::VIDEO_PUBLISH_TIME);
        }
        other => panic!("expected MissingValue, got {other:?}"),
    }
}
