mod comments;
mod common;
mod country_subscriber;
mod daily_performance;
mod video_aggregate;

pub use comments::CommentsParser;
pub use country_subscriber::CountrySubscriberParser;
pub use daily_performance::DailyPerformanceParser;
pub use video_aggregate::VideoAggregateParser;

pub(crate) use common::{build_frame, find_header, locate_columns, normalize_header, read_table};
