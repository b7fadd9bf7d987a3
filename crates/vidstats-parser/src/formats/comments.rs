use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{ParsedTable, TableKind};
use crate::registry::TableParser;

use super::{normalize_header, read_table};

/// Reads the comments export as text columns under their original header names.
#[derive(Default)]
pub struct CommentsParser;

impl CommentsParser {
    const NAME: &'static str = "COMMENTS";
}

impl TableParser for CommentsParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TableKind {
        TableKind::Comments
    }

    fn parse(&self, content: &str) -> Result<ParsedTable, ParserError> {
        let table = read_table(Self::NAME, content)?;

        if !table
            .header
            .iter()
            .any(|cell| normalize_header(cell).contains("comment"))
        {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "header has no comment column".to_string(),
            });
        }

        let mut columns: Vec<Column> = Vec::with_capacity(table.header.len());
        for (position, name) in table.header.iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').trim();
            let values: Vec<Option<&str>> = table
                .rows
                .iter()
                .map(|(_, row)| row.get(position).map(str::trim).filter(|v| !v.is_empty()))
                .collect();
            columns.push(Series::new(name.into(), values).into());
        }

        let df = DataFrame::new(columns).map_err(|err| ParserError::Validation {
            parser: Self::NAME,
            message: format!("failed to build comments dataframe: {err}"),
        })?;

        Ok(ParsedTable {
            kind: self.kind(),
            parser: Self::NAME,
            df,
        })
    }
}
