use crate::errors::ParserError;
use crate::model::{ParsedTable, TableKind};
use crate::registry::TableParser;
use crate::schema::COUNTRY_SUBSCRIBER_COLUMNS;

use super::{build_frame, find_header, locate_columns, read_table};

#[derive(Default)]
pub struct CountrySubscriberParser;

impl CountrySubscriberParser {
    const NAME: &'static str = "COUNTRY_SUBSCRIBER";
}

impl TableParser for CountrySubscriberParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TableKind {
        TableKind::CountrySubscriber
    }

    fn parse(&self, content: &str) -> Result<ParsedTable, ParserError> {
        let table = read_table(Self::NAME, content)?;

        if find_header(&table.header, &["Country Code", "Country"]).is_none() {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "header lacks a Country Code column".to_string(),
            });
        }

        let positions = locate_columns(Self::NAME, &table.header, &COUNTRY_SUBSCRIBER_COLUMNS)?;
        let df = build_frame(
            Self::NAME,
            &COUNTRY_SUBSCRIBER_COLUMNS,
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
