// crates/vidstats/src/main.rs

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vidstats_core::{load_directory, LoadedChannel, PipelineConfig};

mod commands;
mod display;

const DATA_DIR_VAR: &str = "VIDSTATS_DATA_DIR";
const CONFIG_VAR: &str = "VIDSTATS_CONFIG";

/// Channel analytics over exported performance tables
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and write every output table
    Run(commands::run::RunArgs),
    /// Print the short and long window benchmarks side by side
    Benchmarks(InputArgs),
    /// Compare one video's audience and first days against the cohort
    Video(commands::video::VideoArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Directory holding the exported CSV tables (falls back to VIDSTATS_DATA_DIR)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    /// TOML file with window settings (falls back to VIDSTATS_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Inputs resolved from flags and the environment.
pub struct Inputs {
    pub channel: LoadedChannel,
    pub config: PipelineConfig,
}

impl InputArgs {
    pub fn load(&self) -> Result<Inputs> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => env::var(DATA_DIR_VAR)
                .map(PathBuf::from)
                .with_context(|| format!("--data-dir or {DATA_DIR_VAR} must be set"))?,
        };
        let config_path = self
            .config
            .clone()
            .or_else(|| env::var(CONFIG_VAR).ok().map(PathBuf::from));

        let config = load_config(config_path.as_deref())?;
        let channel = load_directory(&data_dir)
            .with_context(|| format!("failed to load tables from {}", data_dir.display()))?;

        Ok(Inputs { channel, config })
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading pipeline config");
            PipelineConfig::from_path(path)
                .with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => commands::run::handle_run(args),
        Command::Benchmarks(args) => commands::benchmarks::handle_benchmarks(args),
        Command::Video(args) => commands::video::handle_video(args),
    }
}
