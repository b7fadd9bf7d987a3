use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::benchmark::{deviation, BenchmarkVector};
use crate::frame::{float_values, metric_column_names};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Expresses every numeric column as its deviation from the benchmark median.
///
/// Identifier, title and temporal columns are copied unchanged and row order is kept.
/// Metrics the benchmark has no median for become entirely null.
pub fn normalize_metrics(
    videos: &DataFrame,
    benchmark: &BenchmarkVector,
) -> Result<DataFrame, NormalizeError> {
    let mut output = videos.clone();
    let mut undefined = 0usize;

    for metric in metric_column_names(videos) {
        let median = benchmark.get(&metric);
        let normalized: Vec<Option<f64>> = float_values(videos, &metric)?
            .into_iter()
            .map(|value| deviation(value, median))
            .collect();
        undefined += normalized.iter().filter(|v| v.is_none()).count();
        output.with_column(Series::new(metric.as_str().into(), normalized))?;
    }

    debug!(
        window_months = benchmark.window_months,
        undefined, "normalized video metrics"
    );
    Ok(output)
}
