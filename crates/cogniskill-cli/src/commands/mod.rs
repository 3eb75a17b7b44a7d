pub mod generate;
pub mod init;
pub mod run;
pub mod validate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use cogniskill_core::config::{load_config_from, PipelineConfig};
use cogniskill_core::pipeline::{PipelineContext, ProgressReporter, Stage};

/// Flags shared by `run` and `generate`. Each one overrides the config file.
#[derive(Args, Debug, Default)]
pub struct PipelineArgs {
    /// Number of students to generate
    #[arg(long)]
    pub students: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output directory
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl PipelineArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(n) = self.students {
            config.students = n;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
    }
}

/// Load the config, apply command-line overrides, then validate.
pub fn build_context(args: &PipelineArgs) -> Result<PipelineContext> {
    let mut config = load_config_from(args.config.as_deref())?;
    args.apply(&mut config);
    PipelineContext::new(config).context("invalid configuration")
}

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_stage_start(&self, stage: Stage) {
        eprintln!("  Starting: {stage}");
    }

    fn on_stage_complete(&self, stage: Stage, elapsed: Duration) {
        eprintln!("  Done: {stage} ({}ms)", elapsed.as_millis());
    }
}

pub fn print_written(paths: &[PathBuf]) {
    for path in paths {
        eprintln!("Wrote: {}", path.display());
    }
}

pub fn output_dir(ctx: &PipelineContext) -> &Path {
    &ctx.config().output_dir
}
