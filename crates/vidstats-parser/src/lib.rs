pub mod errors;
pub mod formats;
pub mod model;
mod registry;
pub mod schema;

pub use errors::{ParserAttempt, ParserError};
pub use model::{ChannelTables, ParsedTable, TableKind};
pub use registry::{parse_table_file, parse_with_parsers, TableParser};
pub use schema::{columns, normalize_video_aggregate};
