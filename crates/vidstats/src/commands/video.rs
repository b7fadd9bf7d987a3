use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;
use vidstats_core::PipelineContext;

use crate::display::{audience_table, first_days_table};
use crate::InputArgs;

#[derive(Args, Debug)]
pub struct VideoArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Video identifier or exact title
    #[arg(short, long)]
    pub video: String,
}

pub fn handle_video(args: VideoArgs) -> Result<()> {
    let inputs = args.input.load()?;
    let context = PipelineContext::new(&inputs.channel.tables, &inputs.config);
    let output = context.run().context("pipeline run failed")?;

    let selected = output.resolve_video(&args.video)?;
    println!("{} ({})", selected.video_title, selected.video_id);

    match context.audience_records(&selected.video_title) {
        Ok(records) => println!("{}", audience_table(&records)),
        Err(err) => warn!(error = %err, "audience breakdown unavailable"),
    }

    let first_days = output.video_first_days(&selected.video_id)?;
    println!("{}", first_days_table(&first_days, &output.cohort_curve)?);
    Ok(())
}
