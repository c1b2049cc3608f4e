pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{
    matched_pairs, output_paths, process_pair, process_pair_reported, process_pairs,
};
pub use types::{NoOpReporter, OutputPaths, PairJob, PairReport, PipelineStage, ProgressReporter};
