pub mod batch;
pub mod composite;
pub mod config;
pub mod info;
pub mod pairs;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use scenepair_core::pipeline::config::{FrameMode, OutputConfig, ScenePairConfig};

/// Load a TOML config file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ScenePairConfig> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ScenePairConfig::from_toml(&contents).context("Invalid config")
        }
        None => Ok(ScenePairConfig::default()),
    }
}

/// Output flags shared by `composite` and `batch`.
#[derive(Args)]
pub struct OutputArgs {
    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory (defaults to the first input's directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the false-colour GeoTIFF
    #[arg(long)]
    pub no_composite: bool,

    /// Skip the GIF animation
    #[arg(long)]
    pub no_gif: bool,

    /// Write grayscale animation frames
    #[arg(long)]
    pub grayscale: bool,

    /// Animation frame delay in milliseconds
    #[arg(long)]
    pub delay: Option<u16>,
}

impl OutputArgs {
    /// Config-file output section with command-line overrides applied.
    pub fn resolve(&self) -> Result<OutputConfig> {
        let mut output = load_config(self.config.as_deref())?.output;
        if self.output.is_some() {
            output.output_dir = self.output.clone();
        }
        if self.no_composite {
            output.write_composite = false;
        }
        if self.no_gif {
            output.write_animation = false;
        }
        if self.grayscale {
            output.frame_mode = FrameMode::Grayscale;
        }
        if let Some(delay) = self.delay {
            output.frame_delay_ms = delay;
        }
        Ok(output)
    }
}
