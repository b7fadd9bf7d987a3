use crate::errors::ParserError;
use crate::model::{ParsedTable, TableKind};
use crate::registry::TableParser;
use crate::schema::{columns, DAILY_PERFORMANCE_COLUMNS};

use super::{build_frame, find_header, locate_columns, read_table};

/// Parses the per-video, per-day performance export. Dates stay textual here; they are
/// parsed leniently further down the pipeline.
#[derive(Default)]
pub struct DailyPerformanceParser;

impl DailyPerformanceParser {
    const NAME: &'static str = "DAILY_PERFORMANCE";
}

impl TableParser for DailyPerformanceParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TableKind {
        TableKind::DailyPerformance
    }

    fn parse(&self, content: &str) -> Result<ParsedTable, ParserError> {
        let table = read_table(Self::NAME, content)?;

        let id_spec = DAILY_PERFORMANCE_COLUMNS
            .iter()
            .find(|spec| spec.name == columns::VIDEO_ID);
        let has_id = id_spec.is_some_and(|spec| find_header(&table.header, spec.aliases).is_some());
        let has_date = find_header(&table.header, &["Date"]).is_some();
        if !has_id || !has_date {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "header lacks a video identifier and Date column".to_string(),
            });
        }

        let positions = locate_columns(Self::NAME, &table.header, &DAILY_PERFORMANCE_COLUMNS)?;
        let df = build_frame(
            Self::NAME,
            &DAILY_PERFORMANCE_COLUMNS,
            &positions,
            &table.rows,
        )?;

        Ok(ParsedTable {
            kind: self.kind(),
            parser: Self::NAME,
            df,
        })
    }
}
