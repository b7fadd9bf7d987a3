use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{
    CommentsParser, CountrySubscriberParser, DailyPerformanceParser, VideoAggregateParser,
};
use crate::model::{ParsedTable, TableKind};

pub trait TableParser {
    fn name(&self) -> &'static str;
    fn kind(&self) -> TableKind;
    fn parse(&self, content: &str) -> Result<ParsedTable, ParserError>;
}

/// Detects which export table `content` holds and parses it.
///
/// Comments are tried last because their only signature is a header mentioning comments.
pub fn parse_table_file(content: &str) -> Result<ParsedTable, ParserError> {
    let video_aggregate = VideoAggregateParser;
    let daily_performance = DailyPerformanceParser;
    let country_subscriber = CountrySubscriberParser;
    let comments = CommentsParser;
    let parsers: [&dyn TableParser; 4] = [
        &video_aggregate,
        &daily_performance,
        &country_subscriber,
        &comments,
    ];
    parse_with_parsers(content, &parsers)
}

pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn TableParser],
) -> Result<ParsedTable, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
