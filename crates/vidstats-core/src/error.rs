// crates/vidstats-core/src/error.rs

use thiserror::Error;

use crate::audience::AudienceError;
use crate::benchmark::BenchmarkError;
use crate::cohort::CohortError;
use crate::config::ConfigError;
use crate::deriver::DeriveError;
use crate::ingestion::IngestionError;
use crate::joiner::JoinError;
use crate::normalize::NormalizeError;
use crate::records::RecordError;
use crate::selection::SelectionError;
use crate::temporal::TemporalError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Table parsing failed: {0}")]
    Parser(#[from] vidstats_parser::ParserError),

    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Temporal parsing failed: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Metric derivation failed: {0}")]
    Derive(#[from] DeriveError),

    #[error("Benchmark calculation failed: {0}")]
    Benchmark(#[from] BenchmarkError),

    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Time series join failed: {0}")]
    Join(#[from] JoinError),

    #[error("Cohort curve failed: {0}")]
    Cohort(#[from] CohortError),

    #[error("Audience classification failed: {0}")]
    Audience(#[from] AudienceError),

    #[error("Video selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("Record construction failed: {0}")]
    Record(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
