use csv::StringRecord;
use polars::prelude::*;

use crate::errors::ParserError;
use crate::schema::{ColumnKind, ColumnSpec};

/// A CSV table split into its header and non-blank data rows.
///
/// Rows keep their 1-based line number so errors can point back into the file.
pub(crate) struct RawTable {
    pub header: StringRecord,
    pub rows: Vec<(usize, StringRecord)>,
}

pub(crate) fn read_table(parser: &'static str, content: &str) -> Result<RawTable, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header = records
        .next()
        .ok_or(ParserError::EmptyData { parser })?
        .map_err(|source| ParserError::Csv { parser, source })?;

    let mut rows = Vec::new();
    for (idx, record) in records.enumerate() {
        let record = record.map_err(|source| ParserError::Csv { parser, source })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push((idx + 2, record));
    }

    Ok(RawTable { header, rows })
}

pub(crate) fn normalize_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

pub(crate) fn find_header(header: &StringRecord, aliases: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        let normalized = normalize_header(cell);
        aliases
            .iter()
            .any(|alias| normalized == alias.to_ascii_lowercase())
    })
}

/// Maps each spec to its header position; optional columns that are absent map to `None`.
pub(crate) fn locate_columns(
    parser: &'static str,
    header: &StringRecord,
    specs: &[ColumnSpec],
) -> Result<Vec<Option<usize>>, ParserError> {
    specs
        .iter()
        .map(|spec| match find_header(header, spec.aliases) {
            Some(position) => Ok(Some(position)),
            None if spec.required => Err(ParserError::MissingColumn {
                parser,
                column: spec.name,
            }),
            None => Ok(None),
        })
        .collect()
}

enum ColumnBuffer {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
    Integer(Vec<Option<i64>>),
    Flag(Vec<Option<bool>>),
}

impl ColumnBuffer {
    fn new(kind: ColumnKind, capacity: usize) -> Self {
        match kind {
            ColumnKind::Text => ColumnBuffer::Text(Vec::with_capacity(capacity)),
            ColumnKind::Float => ColumnBuffer::Float(Vec::with_capacity(capacity)),
            ColumnKind::Integer => ColumnBuffer::Integer(Vec::with_capacity(capacity)),
            ColumnKind::Flag => ColumnBuffer::Flag(Vec::with_capacity(capacity)),
        }
    }

    fn push(
        &mut self,
        parser: &'static str,
        value: &str,
        line_index: usize,
        column: &str,
    ) -> Result<(), ParserError> {
        match self {
            ColumnBuffer::Text(values) => values.push(parse_optional_text(value)),
            ColumnBuffer::Float(values) => {
                values.push(parse_optional_f64(parser, value, line_index, column)?)
            }
            ColumnBuffer::Integer(values) => {
                values.push(parse_optional_i64(parser, value, line_index, column)?)
            }
            ColumnBuffer::Flag(values) => {
                values.push(parse_optional_flag(parser, value, line_index, column)?)
            }
        }
        Ok(())
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            ColumnBuffer::Text(values) => {
                let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
                Series::new(name.into(), utf8).into()
            }
            ColumnBuffer::Float(values) => Series::new(name.into(), values).into(),
            ColumnBuffer::Integer(values) => Series::new(name.into(), values).into(),
            ColumnBuffer::Flag(values) => Series::new(name.into(), values).into(),
        }
    }
}

/// Builds a frame named by `specs`, reading each spec's cell from `positions`.
pub(crate) fn build_frame(
    parser: &'static str,
    specs: &[ColumnSpec],
    positions: &[Option<usize>],
    rows: &[(usize, StringRecord)],
) -> Result<DataFrame, ParserError> {
    let mut buffers: Vec<(&ColumnSpec, usize, ColumnBuffer)> = specs
        .iter()
        .zip(positions)
        .filter_map(|(spec, position)| {
            position.map(|pos| (spec, pos, ColumnBuffer::new(spec.kind, rows.len())))
        })
        .collect();

    for (line_index, row) in rows {
        for (spec, position, buffer) in buffers.iter_mut() {
            let cell = row.get(*position).unwrap_or_default();
            buffer.push(parser, cell, *line_index, spec.name)?;
        }
    }

    let columns: Vec<Column> = buffers
        .into_iter()
        .map(|(spec, _, buffer)| buffer.into_column(spec.name))
        .collect();

    DataFrame::new(columns).map_err(|err| ParserError::Validation {
        parser,
        message: format!("failed to build dataframe: {err}"),
    })
}

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

pub(crate) fn parse_optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn parse_optional_f64(
    parser: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<f64>, ParserError> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    let cleaned = trimmed.replace(',', "");
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|err| ParserError::DataRow {
            parser,
            line_index,
            message: format!("failed to parse column '{column}' as float: {err}"),
        })
}

pub(crate) fn parse_optional_i64(
    parser: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<i64>, ParserError> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    let cleaned = trimmed.replace(',', "");
    if let Ok(parsed) = cleaned.parse::<i64>() {
        return Ok(Some(parsed));
    }

    // Some exports write whole counts as "12.0".
    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.fract() == 0.0 && parsed.is_finite() => Ok(Some(parsed as i64)),
        _ => Err(ParserError::DataRow {
            parser,
            line_index,
            message: format!("failed to parse column '{column}' as integer: '{trimmed}'"),
        }),
    }
}

pub(crate) fn parse_optional_flag(
    parser: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<bool>, ParserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        other => Err(ParserError::DataRow {
            parser,
            line_index,
            message: format!("column '{column}' is not a boolean flag: '{other}'"),
        }),
    }
}
