use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::errors::ParserError;

/// The four tables a channel analytics export is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    VideoAggregate,
    DailyPerformance,
    CountrySubscriber,
    Comments,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::VideoAggregate => "video_aggregate",
            TableKind::DailyPerformance => "daily_performance",
            TableKind::CountrySubscriber => "country_subscriber",
            TableKind::Comments => "comments",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub kind: TableKind,
    pub parser: &'static str,
    pub df: DataFrame,
}

/// Parsed channel export with canonical column names.
///
/// The video aggregate and daily performance tables are required; the country breakdown is
/// only needed for audience classification and comments are carried for the presentation
/// layer without being read.
#[derive(Debug, Clone)]
pub struct ChannelTables {
    pub video_aggregate: DataFrame,
    pub daily_performance: DataFrame,
    pub country_subscriber: Option<DataFrame>,
    pub comments: Option<DataFrame>,
}

impl ChannelTables {
    pub fn from_parsed(tables: Vec<ParsedTable>) -> Result<Self, ParserError> {
        let mut video_aggregate = None;
        let mut daily_performance = None;
        let mut country_subscriber = None;
        let mut comments = None;

        for table in tables {
            let slot = match table.kind {
                TableKind::VideoAggregate => &mut video_aggregate,
                TableKind::DailyPerformance => &mut daily_performance,
                TableKind::CountrySubscriber => &mut country_subscriber,
                TableKind::Comments => &mut comments,
            };
            if slot.is_some() {
                return Err(ParserError::DuplicateTable(table.kind));
            }
            *slot = Some(table.df);
        }

        Ok(Self {
            video_aggregate: video_aggregate
                .ok_or(ParserError::MissingTable(TableKind::VideoAggregate))?,
            daily_performance: daily_performance
                .ok_or(ParserError::MissingTable(TableKind::DailyPerformance))?,
            country_subscriber,
            comments,
        })
    }
}
