use anyhow::{Context, Result};
use vidstats_core::PipelineContext;

use crate::display::{benchmark_table, join_report_table};
use crate::InputArgs;

pub fn handle_benchmarks(args: InputArgs) -> Result<()> {
    let inputs = args.load()?;
    let output = PipelineContext::new(&inputs.channel.tables, &inputs.config)
        .run()
        .context("pipeline run failed")?;

    println!(
        "Benchmarks as of {} ({} videos in {} months, {} in {} months)",
        output.reference_time,
        output.short_benchmark.sample_size,
        output.short_benchmark.window_months,
        output.long_benchmark.sample_size,
        output.long_benchmark.window_months,
    );
    println!("{}", benchmark_table(&output));
    println!("{}", join_report_table(&output.daily_joined.report));
    Ok(())
}
