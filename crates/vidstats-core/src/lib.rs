pub mod audience;
pub mod benchmark;
pub mod cohort;
pub mod config;
pub mod deriver;
pub mod error;
mod frame;
pub mod ingestion;
pub mod joiner;
pub mod normalize;
pub mod outputs;
pub mod pipeline;
pub mod records;
pub mod selection;
pub mod stats;
pub mod temporal;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use ingestion::{load_directory, LoadedChannel};
pub use outputs::write_outputs;
pub use pipeline::{PipelineContext, PipelineOutput};
pub use vidstats_parser::ChannelTables;
