use csv::StringRecord;

use crate::errors::ParserError;
use crate::model::{ParsedTable, TableKind};
use crate::registry::TableParser;
use crate::schema::VIDEO_AGGREGATE_COLUMNS;

use super::{build_frame, normalize_header, read_table};

/// Parses the per-video aggregate export.
///
/// The export's headers are verbose and positional, so columns are renamed by position
/// rather than looked up by name. The channel totals row that sits directly below the
/// header is dropped.
#[derive(Default)]
pub struct VideoAggregateParser;

impl VideoAggregateParser {
    const NAME: &'static str = "VIDEO_AGGREGATE";

    fn check_signature(header: &StringRecord) -> Result<(), ParserError> {
        let first = header.get(0).map(normalize_header).unwrap_or_default();
        let publish = header.get(2).map(normalize_header).unwrap_or_default();
        if first != "video" || !publish.contains("publish time") {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "header does not start with Video, Video title, Video publish time"
                    .to_string(),
            });
        }

        if header.len() != VIDEO_AGGREGATE_COLUMNS.len() {
            return Err(ParserError::InvalidHeader {
                parser: Self::NAME,
                message: format!(
                    "expected {} columns, found {}",
                    VIDEO_AGGREGATE_COLUMNS.len(),
                    header.len()
                ),
            });
        }

        Ok(())
    }

    /// The channel totals row is labelled `Total`. Unlabelled exports leave both the
    /// title and the publish time of the first data row empty.
    fn is_totals_row(position: usize, row: &StringRecord) -> bool {
        let id = row.get(0).unwrap_or_default().trim();
        let title = row.get(1).unwrap_or_default().trim();
        let publish = row.get(2).unwrap_or_default().trim();
        id.eq_ignore_ascii_case("total")
            || (position == 0 && title.is_empty() && publish.is_empty())
    }
}

impl TableParser for VideoAggregateParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TableKind {
        TableKind::VideoAggregate
    }

    fn parse(&self, content: &str) -> Result<ParsedTable, ParserError> {
        let table = read_table(Self::NAME, content)?;
        Self::check_signature(&table.header)?;

        let rows: Vec<(usize, StringRecord)> = table
            .rows
            .into_iter()
            .enumerate()
            .filter(|(position, (_, row))| !Self::is_totals_row(*position, row))
            .map(|(_, row)| row)
            .collect();

        let positions: Vec<Option<usize>> = (0..VIDEO_AGGREGATE_COLUMNS.len()).map(Some).collect();
        let df = build_frame(Self::NAME, &VIDEO_AGGREGATE_COLUMNS, &positions, &rows)?;

        Ok(ParsedTable {
            kind: self.kind(),
            parser: Self::NAME,
            df,
        })
    }
}
