//! The `cogniskill generate` command.

use anyhow::Result;

use cogniskill_core::pipeline::run_generation;
use cogniskill_report::export_dataset;

use super::{build_context, output_dir, print_written, ConsoleReporter, PipelineArgs};

pub fn execute(args: PipelineArgs) -> Result<()> {
    let ctx = build_context(&args)?;
    eprintln!(
        "cogniskill v{}: Generating {} students (seed {})",
        env!("CARGO_PKG_VERSION"),
        ctx.config().students,
        ctx.config().seed
    );

    let dataset = run_generation(&ctx, &ConsoleReporter)?;
    let written = export_dataset(&dataset, output_dir(&ctx))?;
    print_written(&written);

    Ok(())
}
