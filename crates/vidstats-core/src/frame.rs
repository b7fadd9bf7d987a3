use polars::prelude::*;

pub(crate) const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;

pub(crate) fn datetime_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Microseconds, None)
}

/// Numeric in the sense of "a metric": floats and integers, not temporal types.
pub(crate) fn is_metric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

pub(crate) fn metric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| is_metric_dtype(column.dtype()))
        .map(|column| column.name().to_string())
        .collect()
}

/// Reads a column as floats; NaN and infinities are treated as missing.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect())
}

/// Reads integer or temporal columns by their physical `i64` representation.
pub(crate) fn int_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

pub(crate) fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

pub(crate) fn flag_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<bool>>> {
    Ok(df.column(name)?.bool()?.into_iter().collect())
}

pub(crate) fn datetime_series(name: &str, micros: Vec<Option<i64>>) -> PolarsResult<Series> {
    Series::new(name.into(), micros).cast(&datetime_dtype())
}

pub(crate) fn take_rows(df: &DataFrame, rows: &[usize]) -> PolarsResult<DataFrame> {
    let indices: Vec<IdxSize> = rows.iter().map(|&row| row as IdxSize).collect();
    df.take(&IdxCa::from_vec("rows".into(), indices))
}
