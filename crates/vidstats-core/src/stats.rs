//! Grouped aggregation as polars expressions.

use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregator {
    Mean,
    /// Even-sized groups average the two middle values.
    Median,
    /// Linear interpolation between the closest ranks, rank = `pct / 100 * (n - 1)`.
    Percentile(f64),
}

impl Aggregator {
    pub fn expr(&self, value: &str) -> Expr {
        match self {
            Aggregator::Mean => col(value).mean(),
            Aggregator::Median => col(value).median(),
            Aggregator::Percentile(pct) => {
                col(value).quantile(lit(*pct / 100.0), QuantileMethod::Linear)
            }
        }
    }
}

/// Groups `df` by `key` and applies each `(output name, aggregator)` pair to `value`.
/// The result has one row per key, in ascending key order, with the key column first
/// and the aggregate columns in the order given.
pub fn group_aggregate(
    df: &DataFrame,
    key: &str,
    value: &str,
    aggregators: &[(&str, Aggregator)],
) -> PolarsResult<DataFrame> {
    let exprs: Vec<Expr> = aggregators
        .iter()
        .map(|(name, aggregator)| aggregator.expr(value).alias(*name))
        .collect();

    df.clone()
        .lazy()
        .group_by([col(key)])
        .agg(exprs)
        .sort([key], SortMultipleOptions::default())
        .collect()
}
