use std::path::PathBuf;

use crate::composite::Overlap;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug)]
pub enum PipelineStage {
    Reading,
    Compositing,
    Writing,
    Batch,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading rasters"),
            Self::Compositing => write!(f, "Compositing overlap"),
            Self::Writing => write!(f, "Writing output"),
            Self::Batch => write!(f, "Processing pairs"),
        }
    }
}

/// Two raster files to composite.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PairJob {
    pub a: PathBuf,
    pub b: PathBuf,
}

/// Artifact locations for one pair.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputPaths {
    pub composite: PathBuf,
    pub animation: PathBuf,
}

/// What was produced for one pair.
#[derive(Clone, Debug)]
pub struct PairReport {
    pub overlap: Overlap,
    /// Pixels where both scenes have data.
    pub valid_pixels: usize,
    pub composite: Option<PathBuf>,
    pub animation: Option<PathBuf>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage (e.g., pair count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
