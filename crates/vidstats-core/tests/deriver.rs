mod common;

use polars::prelude::*;
use vidstats_core::deriver::{
    derive_metrics, ratio, AVG_DURATION_SEC, ENGAGEMENT_RATIO, VIEWS_PER_SUBSCRIBER_GAINED,
};
use vidstats_parser::columns;

use common::{assert_close, duration_ms_column};

fn video_frame(views: &[f64], subscribers_gained: &[f64]) -> DataFrame {
    let n = views.len();
    DataFrame::new(vec![
        Series::new(columns::VIDEO_ID.into(), (0..n).map(|i| format!("v{i}")).collect::<Vec<_>>())
            .into(),
        duration_ms_column(columns::AVERAGE_VIEW_DURATION, &vec![200_500; n]),
        Series::new(columns::COMMENTS_ADDED.into(), vec![1.0f64; n]).into(),
        Series::new(columns::SHARES.into(), vec![2.0f64; n]).into(),
        Series::new(columns::DISLIKES.into(), vec![3.0f64; n]).into(),
        Series::new(columns::LIKES.into(), vec![4.0f64; n]).into(),
        Series::new(columns::VIEWS.into(), views.to_vec()).into(),
        Series::new(columns::SUBSCRIBERS_GAINED.into(), subscribers_gained.to_vec()).into(),
    ])
    .unwrap()
}

#[test]
fn appends_derived_columns() -> PolarsResult<()> {
    let derived = derive_metrics(&video_frame(&[100.0], &[10.0])).expect("derive");

    let seconds = derived.column(AVG_DURATION_SEC)?.i64()?;
    assert_eq!(seconds.get(0), Some(200));

    let engagement = derived.column(ENGAGEMENT_RATIO)?.f64()?;
    assert_close(engagement.get(0).unwrap(), 0.1);

    let per_sub = derived.column(VIEWS_PER_SUBSCRIBER_GAINED)?.f64()?;
    assert_close(per_sub.get(0).unwrap(), 10.0);

    assert_eq!(derived.height(), 1);
    Ok(())
}

#[test]
fn zero_subscribers_gained_is_undefined() -> PolarsResult<()> {
    let derived = derive_metrics(&video_frame(&[100.0], &[0.0])).expect("derive");

    let per_sub = derived.column(VIEWS_PER_SUBSCRIBER_GAINED)?.f64()?;
    assert_eq!(per_sub.get(0), None);

    let engagement = derived.column(ENGAGEMENT_RATIO)?.f64()?;
    assert_close(engagement.get(0).unwrap(), 0.1);
    Ok(())
}

#[test]
fn ratios_are_undefined_iff_denominator_is_zero() -> PolarsResult<()> {
    let views = [0.0, 50.0, 0.0, 1_000.0];
    let gained = [5.0, 0.0, 0.0, 4.0];
    let derived = derive_metrics(&video_frame(&views, &gained)).expect("derive");

    let engagement = derived.column(ENGAGEMENT_RATIO)?.f64()?;
    let per_sub = derived.column(VIEWS_PER_SUBSCRIBER_GAINED)?.f64()?;

    for idx in 0..views.len() {
        match engagement.get(idx) {
            None => assert_eq!(views[idx], 0.0),
            Some(value) => assert_close(value, 10.0 / views[idx]),
        }
        match per_sub.get(idx) {
            None => assert_eq!(gained[idx], 0.0),
            Some(value) => assert_close(value, views[idx] / gained[idx]),
        }
    }
    // Zero views over a non-zero denominator is a real zero.
    assert_eq!(per_sub.get(0), Some(0.0));
    Ok(())
}

#[test]
fn ratio_handles_missing_inputs() {
    assert_eq!(ratio(Some(3.0), Some(0.0)), None);
    assert_eq!(ratio(None, Some(2.0)), None);
    assert_eq!(ratio(Some(3.0), None), None);
    assert_eq!(ratio(Some(3.0), Some(2.0)), Some(1.5));
    assert_eq!(ratio(Some(-4.0), Some(2.0)), Some(-2.0));
}
