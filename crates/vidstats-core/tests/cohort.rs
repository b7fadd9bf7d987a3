mod common;

use polars::prelude::*;
use vidstats_core::cohort::{build_cohort_curve, MEDIAN_VIEWS, PCT80_VIEWS};
use vidstats_core::joiner::{join_publish_dates, DAYS_PUBLISHED};
use vidstats_parser::columns;

use common::{assert_close, at, datetime_column};

fn videos() -> DataFrame {
    DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["jan", "other", "old"]).into(),
        datetime_column(
            columns::VIDEO_PUBLISH_TIME,
            &[Some("2023-01-01"), Some("2023-01-01"), Some("2021-06-01")],
        ),
    ])
    .unwrap()
}

fn joined(rows: &[(&str, &str, i64)]) -> DataFrame {
    let ids: Vec<&str> = rows.iter().map(|(id, _, _)| *id).collect();
    let dates: Vec<Option<&str>> = rows.iter().map(|(_, date, _)| Some(*date)).collect();
    let views: Vec<i64> = rows.iter().map(|(_, _, views)| *views).collect();
    let daily = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), ids).into(),
        datetime_column(columns::DATE, &dates),
        Series::new(columns::VIEWS.into(), views).into(),
    ])
    .unwrap();
    join_publish_dates(&daily, &videos())
        .expect("join")
        .dataframe
}

fn example_rows() -> DataFrame {
    joined(&[
        ("jan", "2023-01-01", 10),
        ("jan", "2023-01-02", 20),
        ("jan", "2023-01-03", 15),
        ("other", "2023-01-01", 30),
    ])
}

#[test]
fn day_zero_mean_and_cumulative_median() {
    let curve = build_cohort_curve(&example_rows(), at("2023-01-01"), 12, 30).expect("curve");

    assert_eq!(curve.cohort_cutoff, at("2022-01-01"));
    let days: Vec<i64> = curve.points.iter().map(|p| p.days_published).collect();
    assert_eq!(days, vec![0, 1, 2]);

    let day0 = curve.point(0).unwrap();
    assert_close(day0.mean_views, 20.0);
    assert_close(day0.median_views, 20.0);
    assert_close(day0.pct20_views, 14.0);
    assert_close(day0.pct80_views, 26.0);

    let day1 = curve.point(1).unwrap();
    assert_close(day1.mean_views, 20.0);
    assert_close(day1.median_views, 40.0);

    let day2 = curve.point(2).unwrap();
    assert_close(day2.mean_views, 15.0);
    assert_close(day2.median_views, 55.0);
    assert_close(day2.pct20_views, 49.0);
    assert_close(day2.pct80_views, 61.0);
}

#[test]
fn bands_are_ordered_and_non_decreasing() {
    let rows = joined(&[
        ("jan", "2023-01-01", 12),
        ("other", "2023-01-01", 3),
        ("jan", "2023-01-02", 40),
        ("other", "2023-01-02", 0),
        ("jan", "2023-01-05", 8),
        ("other", "2023-01-05", 90),
        ("other", "2023-01-06", 1),
    ]);
    let curve = build_cohort_curve(&rows, at("2023-01-01"), 12, 30).expect("curve");

    for point in &curve.points {
        assert!(point.pct20_views <= point.median_views);
        assert!(point.median_views <= point.pct80_views);
    }
    for pair in curve.points.windows(2) {
        assert!(pair[0].days_published < pair[1].days_published);
        assert!(pair[0].median_views <= pair[1].median_views);
        assert!(pair[0].pct20_views <= pair[1].pct20_views);
        assert!(pair[0].pct80_views <= pair[1].pct80_views);
    }
    // Day-offsets without rows are absent rather than zero-filled.
    assert!(curve.point(2).is_none());
}

#[test]
fn excludes_old_videos_out_of_range_days_and_negative_offsets() {
    let rows = joined(&[
        ("jan", "2022-12-31", 500),
        ("jan", "2023-01-01", 10),
        ("jan", "2023-01-31", 7),
        ("jan", "2023-02-01", 1000),
        ("old", "2021-06-01", 800),
    ]);
    let curve = build_cohort_curve(&rows, at("2023-01-01"), 12, 30).expect("curve");

    let days: Vec<i64> = curve.points.iter().map(|p| p.days_published).collect();
    assert_eq!(days, vec![0, 30]);
    assert_close(curve.point(0).unwrap().mean_views, 10.0);
    assert_close(curve.point(30).unwrap().median_views, 17.0);
}

#[test]
fn curve_frame_has_cohort_columns() -> PolarsResult<()> {
    let curve = build_cohort_curve(&example_rows(), at("2023-01-01"), 12, 30).expect("curve");
    let df = curve.to_dataframe()?;

    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_column_names(),
        &[DAYS_PUBLISHED, "mean_views", MEDIAN_VIEWS, "pct20_views", PCT80_VIEWS]
    );
    let medians = df.column(MEDIAN_VIEWS)?.f64()?;
    assert_eq!(medians.get(2), Some(55.0));
    Ok(())
}

#[test]
fn empty_cohort_gives_empty_curve() {
    let rows = joined(&[("old", "2021-06-02", 800)]);
    let curve = build_cohort_curve(&rows, at("2023-01-01"), 12, 30).expect("curve");
    assert!(curve.points.is_empty());
}

#[test]
fn null_views_are_left_out_of_the_day_statistics() {
    let daily = DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), &["jan", "other", "jan", "other"]).into(),
        datetime_column(columns::DATE, &[Some("2023-01-01"); 4]),
        Series::new(
            columns::VIEWS.into(),
            &[Some(7i64), Some(10), None, Some(30)],
        )
        .into(),
    ])
    .unwrap();
    let rows = join_publish_dates(&daily, &videos()).expect("join").dataframe;
    let curve = build_cohort_curve(&rows, at("2023-01-01"), 12, 30).expect("curve");

    assert_eq!(curve.points.len(), 1);
    let day0 = curve.point(0).unwrap();
    assert_close(day0.mean_views, 47.0 / 3.0);
    assert_close(day0.median_views, 10.0);
    assert_close(day0.pct20_views, 8.2);
    assert_close(day0.pct80_views, 22.0);
}
