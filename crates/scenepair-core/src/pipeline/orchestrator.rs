use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::composite::{composite_with, CompositeOptions};
use crate::error::Result;
use crate::io::geotiff::{read_geotiff, write_geotiff};
use crate::io::gif::write_gif;
use crate::matcher::find_pairs_with;
use crate::scene::ScenePair;

use super::config::{MatchConfig, OutputConfig};
use super::types::{
    NoOpReporter, OutputPaths, PairJob, PairReport, PipelineStage, ProgressReporter,
};

/// Output locations `<stem_a>__<stem_b>.tif` / `.gif`.
///
/// Without an explicit directory, outputs land next to the first input.
pub fn output_paths(a: &Path, b: &Path, output_dir: Option<&Path>) -> OutputPaths {
    let stem = |p: &Path| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scene")
            .to_string()
    };
    let basename = format!("{}__{}", stem(a), stem(b));
    let dir: PathBuf = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => a.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };
    OutputPaths {
        composite: dir.join(format!("{basename}.tif")),
        animation: dir.join(format!("{basename}.gif")),
    }
}

/// Composite one pair of raster files and write the enabled artifacts.
pub fn process_pair(a: &Path, b: &Path, config: &OutputConfig) -> Result<PairReport> {
    process_pair_reported(a, b, config, &NoOpReporter)
}

/// Same as [`process_pair`], reporting stages as it goes.
///
/// Nothing is written unless compositing succeeds.
pub fn process_pair_reported(
    a: &Path,
    b: &Path,
    config: &OutputConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PairReport> {
    let paths = output_paths(a, b, config.output_dir.as_deref());

    reporter.begin_stage(PipelineStage::Reading, Some(2));
    let raster_a = read_geotiff(a)?;
    reporter.advance(1);
    let raster_b = read_geotiff(b)?;
    reporter.advance(2);
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Compositing, None);
    let options = CompositeOptions {
        frame_mode: config.frame_mode,
        frame_delay_ms: config.frame_delay_ms,
    };
    let output = composite_with(&raster_a, &raster_b, &options)?;
    reporter.finish_stage();

    let valid_pixels = output.mask.iter().filter(|&&m| m != 0).count();
    info!(
        a = %a.display(),
        b = %b.display(),
        cols = output.overlap.cols,
        rows = output.overlap.rows,
        valid_pixels,
        "Composited pair"
    );

    reporter.begin_stage(PipelineStage::Writing, None);
    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let composite = if config.write_composite {
        if let Err(e) = write_geotiff(&output.composite, &paths.composite) {
            discard_outputs(&[paths.composite.as_path()]);
            return Err(e);
        }
        info!(path = %paths.composite.display(), "Wrote composite");
        Some(paths.composite)
    } else {
        None
    };

    let animation = if config.write_animation {
        if let Err(e) = write_gif(&output.animation, &paths.animation) {
            let mut written = vec![paths.animation.as_path()];
            written.extend(composite.as_deref());
            discard_outputs(&written);
            return Err(e);
        }
        info!(path = %paths.animation.display(), "Wrote animation");
        Some(paths.animation)
    } else {
        None
    };
    reporter.finish_stage();

    Ok(PairReport {
        overlap: output.overlap,
        valid_pixels,
        composite,
        animation,
    })
}

/// Remove artifacts of a pair whose writing failed part way.
fn discard_outputs(paths: &[&Path]) {
    for path in paths.iter().filter(|p| p.is_file()) {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Could not remove partial output");
        }
    }
}

/// Process independent pairs in parallel. A failing pair is reported in its
/// slot and never stops the others.
pub fn process_pairs(
    jobs: &[PairJob],
    config: &OutputConfig,
    reporter: &dyn ProgressReporter,
) -> Vec<(PairJob, Result<PairReport>)> {
    reporter.begin_stage(PipelineStage::Batch, Some(jobs.len()));
    let done = AtomicUsize::new(0);

    let results: Vec<(PairJob, Result<PairReport>)> = jobs
        .par_iter()
        .map(|job| {
            let result = process_pair(&job.a, &job.b, config);
            if let Err(ref e) = result {
                warn!(a = %job.a.display(), b = %job.b.display(), error = %e, "Pair failed");
            }
            reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
            (job.clone(), result)
        })
        .collect();

    reporter.finish_stage();
    results
}

/// Fetch scenes from a catalog and return the matched pairs.
pub fn matched_pairs(catalog: &dyn Catalog, config: &MatchConfig) -> Result<Vec<ScenePair>> {
    let scenes = catalog.scenes()?;
    info!(scenes = scenes.len(), "Loaded scene metadata");
    Ok(find_pairs_with(&scenes, config))
}
