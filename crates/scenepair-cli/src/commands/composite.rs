use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use scenepair_core::pipeline::{output_paths, process_pair};

use super::OutputArgs;
use crate::summary::{print_output_summary, print_pair_report};

#[derive(Args)]
pub struct CompositeArgs {
    /// First (earlier) raster
    pub first: PathBuf,

    /// Second (later) raster
    pub second: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: &CompositeArgs) -> Result<()> {
    let config = args.output.resolve()?;
    let paths = output_paths(&args.first, &args.second, config.output_dir.as_deref());
    print_output_summary(&args.first, &args.second, &config, &paths);

    let report = process_pair(&args.first, &args.second, &config).with_context(|| {
        format!(
            "Failed to composite {} and {}",
            args.first.display(),
            args.second.display()
        )
    })?;

    print_pair_report(&report);
    Ok(())
}
