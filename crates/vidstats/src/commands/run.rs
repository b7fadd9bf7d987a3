use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vidstats_core::{write_outputs, PipelineContext};

use crate::InputArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Directory the parquet and JSON outputs are written to
    #[arg(short, long)]
    pub out_dir: PathBuf,
}

pub fn handle_run(args: RunArgs) -> Result<()> {
    let inputs = args.input.load()?;
    let output = PipelineContext::new(&inputs.channel.tables, &inputs.config)
        .run()
        .context("pipeline run failed")?;

    let summary = write_outputs(&args.out_dir, &output, &inputs.config, &inputs.channel.reports)?;

    println!("Reference time: {}", output.reference_time);
    println!(
        "Videos: {}  Joined daily rows: {}  Cohort days: {}",
        output.video_metrics.height(),
        output.daily_joined.report.joined_rows,
        output.cohort_curve.points.len()
    );
    for file in &summary.files {
        println!("  {} ({} rows)", summary.dir.join(&file.file).display(), file.rows);
    }
    Ok(())
}
