use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use scenepair_core::catalog::FileCatalog;
use scenepair_core::pipeline::matched_pairs;

use super::load_config;

#[derive(Args)]
pub struct PairsArgs {
    /// Saved search result (GeoJSON FeatureCollection)
    pub file: PathBuf,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Largest acquisition time gap in seconds (inclusive)
    #[arg(long)]
    pub max_gap: Option<f64>,

    /// Do not require matching provider values
    #[arg(long)]
    pub ignore_provider: bool,
}

pub fn run(args: &PairsArgs) -> Result<()> {
    let mut matching = load_config(args.config.as_deref())?.matching;
    if let Some(gap) = args.max_gap {
        matching.max_time_gap_secs = gap;
    }
    if args.ignore_provider {
        matching.require_provider = false;
    }

    let catalog = FileCatalog::new(&args.file);
    println!("Finding pairs...");
    let pairs = matched_pairs(&catalog, &matching)
        .with_context(|| format!("Failed to load scenes from {}", args.file.display()))?;

    for pair in &pairs {
        let (a, b) = pair.ids();
        println!("{a} {b}");
    }
    println!("Pairs found: {}", pairs.len());

    Ok(())
}
