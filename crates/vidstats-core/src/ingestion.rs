use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use vidstats_parser::{
    parse_table_file, ChannelTables, ParsedTable, ParserAttempt, ParserError, TableKind,
};

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("failed to walk data directory: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParserError,
    },
    #[error("data directory does not form a channel export: {0}")]
    Tables(#[source] ParserError),
}

#[derive(Debug)]
pub struct FileInput<'a> {
    pub path: &'a str,
    pub contents: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Parsed,
    Duplicate,
    Unrecognized,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub blake3: String,
    pub status: FileStatus,
    pub kind: Option<TableKind>,
    pub parser: Option<&'static str>,
    pub rows: usize,
    pub parser_attempts: Vec<String>,
}

#[derive(Debug)]
pub struct IngestionBatch {
    pub tables: Vec<ParsedTable>,
    pub reports: Vec<FileReport>,
}

/// A channel export loaded from disk, with per-file reports for the run manifest.
#[derive(Debug, Clone)]
pub struct LoadedChannel {
    pub tables: ChannelTables,
    pub reports: Vec<FileReport>,
}

pub fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}

/// Detects the table kind of every input.
///
/// Files no parser recognises are reported and skipped, and byte-identical repeats are
/// skipped as duplicates. A file that a parser recognises but cannot read is fatal.
pub fn ingest_files(inputs: &[FileInput<'_>]) -> Result<IngestionBatch, IngestionError> {
    let mut seen = HashSet::new();
    let mut tables = Vec::new();
    let mut reports = Vec::new();

    for input in inputs {
        let hash = compute_hash(input.contents);
        let mut report = FileReport {
            path: input.path.to_string(),
            blake3: hash.clone(),
            status: FileStatus::Unrecognized,
            kind: None,
            parser: None,
            rows: 0,
            parser_attempts: Vec::new(),
        };

        if !seen.insert(hash) {
            report.status = FileStatus::Duplicate;
            reports.push(report);
            continue;
        }

        let Ok(content) = std::str::from_utf8(input.contents) else {
            warn!(path = input.path, "skipping file that is not valid UTF-8");
            report.parser_attempts = vec![ParserAttempt::new(
                "utf8",
                "file contents were not valid UTF-8",
            )
            .to_string()];
            reports.push(report);
            continue;
        };

        match parse_table_file(content) {
            Ok(table) => {
                report.status = FileStatus::Parsed;
                report.kind = Some(table.kind);
                report.parser = Some(table.parser);
                report.rows = table.df.height();
                tables.push(table);
            }
            Err(ParserError::NoMatchingParser { attempts }) => {
                warn!(path = input.path, "no parser recognised file");
                report.parser_attempts = attempts.iter().map(ToString::to_string).collect();
            }
            Err(source) => {
                return Err(IngestionError::Parse {
                    path: input.path.to_string(),
                    source,
                })
            }
        }
        reports.push(report);
    }

    Ok(IngestionBatch { tables, reports })
}

/// `*.csv` files directly inside `dir`, in path order.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, IngestionError> {
    let pattern = dir.join("*.csv");
    let mut paths = glob::glob(&pattern.to_string_lossy())?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

pub fn load_directory(dir: &Path) -> Result<LoadedChannel, IngestionError> {
    let paths = discover_csv_files(dir)?;

    let mut contents = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = fs::read(path).map_err(|source| IngestionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        contents.push((path.display().to_string(), bytes));
    }

    let inputs: Vec<FileInput<'_>> = contents
        .iter()
        .map(|(path, bytes)| FileInput {
            path: path.as_str(),
            contents: bytes.as_slice(),
        })
        .collect();

    let batch = ingest_files(&inputs)?;
    info!(
        dir = %dir.display(),
        files = inputs.len(),
        tables = batch.tables.len(),
        "ingested channel export"
    );

    let tables = ChannelTables::from_parsed(batch.tables).map_err(IngestionError::Tables)?;
    Ok(LoadedChannel {
        tables,
        reports: batch.reports,
    })
}
