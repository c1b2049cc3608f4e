use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use scenepair_core::pipeline::{process_pairs, PairJob, PipelineStage, ProgressReporter};
use serde::Deserialize;

use super::OutputArgs;

#[derive(Args)]
pub struct BatchArgs {
    /// Manifest (TOML) listing `[[pair]]` entries with `a` and `b` paths
    pub manifest: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default, rename = "pair")]
    pairs: Vec<PairJob>,
}

struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        if let Some(total) = total_items {
            self.bar.set_length(total as u64);
        }
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.bar.finish_with_message("Done");
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;
    let manifest: Manifest = toml::from_str(&contents).context("Invalid manifest")?;
    let config = args.output.resolve()?;

    println!("Batch: {} pair(s)", manifest.pairs.len());

    let bar = ProgressBar::new(manifest.pairs.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };

    let results = process_pairs(&manifest.pairs, &config, &reporter);

    let mut failed = 0usize;
    for (job, result) in &results {
        match result {
            Ok(report) => println!(
                "  ok    {} + {} ({}x{})",
                job.a.display(),
                job.b.display(),
                report.overlap.cols,
                report.overlap.rows
            ),
            Err(e) => {
                failed += 1;
                println!("  FAIL  {} + {}: {e}", job.a.display(), job.b.display());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} pair(s) failed", results.len());
    }
    Ok(())
}
