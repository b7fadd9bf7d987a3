use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::DataFrame;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::config::PipelineConfig;
use crate::ingestion::{compute_hash, FileReport};
use crate::pipeline::PipelineOutput;

pub const VIDEO_METRICS_FILE: &str = "video_metrics.parquet";
pub const NORMALIZED_METRICS_FILE: &str = "normalized_metrics.parquet";
pub const DAILY_JOINED_FILE: &str = "daily_joined.parquet";
pub const COHORT_CURVE_FILE: &str = "cohort_curve.parquet";
pub const BENCHMARKS_FILE: &str = "benchmarks.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub file: String,
    pub rows: usize,
    pub blake3: String,
}

#[derive(Debug, Clone)]
pub struct OutputSummary {
    pub dir: PathBuf,
    pub files: Vec<WrittenFile>,
}

/// Writes the run's tables as parquet plus the benchmark and manifest JSON documents.
///
/// Nothing time-dependent is written, so identical inputs give identical files.
pub fn write_outputs(
    dir: &Path,
    output: &PipelineOutput,
    config: &PipelineConfig,
    inputs: &[FileReport],
) -> Result<OutputSummary> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let cohort_frame = output
        .cohort_curve
        .to_dataframe()
        .context("failed to build cohort curve frame")?;

    let mut files = Vec::new();
    for (name, frame) in [
        (VIDEO_METRICS_FILE, &output.video_metrics),
        (NORMALIZED_METRICS_FILE, &output.normalized_metrics),
        (DAILY_JOINED_FILE, &output.daily_joined.dataframe),
        (COHORT_CURVE_FILE, &cohort_frame),
    ] {
        let bytes = create_parquet_bytes(frame)
            .with_context(|| format!("failed to serialize {name}"))?;
        write_file(dir, name, &bytes)?;
        files.push(WrittenFile {
            file: name.to_string(),
            rows: frame.height(),
            blake3: compute_hash(&bytes),
        });
    }

    let benchmarks = json!({
        "reference_time": output.reference_time,
        "short": output.short_benchmark,
        "long": output.long_benchmark,
        "delta": output.benchmark_delta(),
    });
    let bytes = serde_json::to_vec_pretty(&benchmarks)?;
    write_file(dir, BENCHMARKS_FILE, &bytes)?;
    files.push(WrittenFile {
        file: BENCHMARKS_FILE.to_string(),
        rows: output.long_benchmark.entries.len(),
        blake3: compute_hash(&bytes),
    });

    let manifest = json!({
        "reference_time": output.reference_time,
        "config": config,
        "inputs": inputs.iter().map(manifest_input).collect::<Vec<_>>(),
        "join": output.daily_joined.report,
        "cohort_cutoff": output.cohort_curve.cohort_cutoff,
        "outputs": files,
    });
    let bytes = serde_json::to_vec_pretty(&manifest)?;
    write_file(dir, MANIFEST_FILE, &bytes)?;

    info!(dir = %dir.display(), files = files.len() + 1, "wrote pipeline outputs");
    Ok(OutputSummary {
        dir: dir.to_path_buf(),
        files,
    })
}

fn manifest_input(report: &FileReport) -> serde_json::Value {
    let file = Path::new(&report.path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.path.clone());
    json!({
        "file": file,
        "blake3": report.blake3,
        "status": report.status,
        "kind": report.kind,
        "parser": report.parser,
        "rows": report.rows,
    })
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

fn create_parquet_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let mut clone = df.clone();
        ParquetWriter::new(&mut cursor)
            .with_compression(ParquetCompression::Zstd(None))
            .with_statistics(StatisticsOptions::default())
            .finish(&mut clone)
            .context("failed to write parquet to buffer")?;
    }
    Ok(buffer)
}
