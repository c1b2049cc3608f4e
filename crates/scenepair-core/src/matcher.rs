//! Decide which scene records show the same footprint captured moments apart.

use tracing::{debug, info};

use crate::geo::rings_intersect;
use crate::pipeline::config::MatchConfig;
use crate::scene::{Footprint, SceneMetadata, ScenePair};

/// Reason a candidate pair was rejected. Rejection is an expected outcome,
/// never an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Mismatch {
    Satellite,
    Strip,
    Provider,
    TimeGap(f64),
    UnsupportedGeometry(String),
    Disjoint,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satellite => write!(f, "satellite ids differ"),
            Self::Strip => write!(f, "strip ids differ"),
            Self::Provider => write!(f, "providers differ"),
            Self::TimeGap(secs) => write!(f, "acquired {secs:.3}s apart"),
            Self::UnsupportedGeometry(kind) => write!(f, "unsupported geometry {kind}"),
            Self::Disjoint => write!(f, "footprints do not intersect"),
        }
    }
}

/// Check every pair predicate, returning the first one that fails.
pub fn check_pair(
    a: &SceneMetadata,
    b: &SceneMetadata,
    config: &MatchConfig,
) -> std::result::Result<(), Mismatch> {
    if a.satellite_id != b.satellite_id {
        return Err(Mismatch::Satellite);
    }
    if a.strip_id != b.strip_id {
        return Err(Mismatch::Strip);
    }
    if config.require_provider && a.provider != b.provider {
        return Err(Mismatch::Provider);
    }

    let gap = a.time_gap_secs(b);
    if gap > config.max_time_gap_secs {
        return Err(Mismatch::TimeGap(gap));
    }

    let (ring_a, ring_b) = match (&a.footprint, &b.footprint) {
        (Footprint::Polygon(rings_a), Footprint::Polygon(rings_b)) => {
            match (rings_a.first(), rings_b.first()) {
                (Some(ra), Some(rb)) => (ra, rb),
                _ => return Err(Mismatch::Disjoint),
            }
        }
        (Footprint::Polygon(_), other) | (other, _) => {
            return Err(Mismatch::UnsupportedGeometry(other.type_name().to_string()));
        }
    };

    if rings_intersect(ring_a, ring_b) {
        Ok(())
    } else {
        Err(Mismatch::Disjoint)
    }
}

/// Whether two scenes form a pair under the default thresholds.
pub fn is_pair(a: &SceneMetadata, b: &SceneMetadata) -> bool {
    check_pair(a, b, &MatchConfig::default()).is_ok()
}

/// All pairs among `scenes`, using the default thresholds.
pub fn find_pairs(scenes: &[SceneMetadata]) -> Vec<ScenePair> {
    find_pairs_with(scenes, &MatchConfig::default())
}

/// All pairs among `scenes`. Each unordered combination is considered once,
/// in (i, j) order with i < j.
pub fn find_pairs_with(scenes: &[SceneMetadata], config: &MatchConfig) -> Vec<ScenePair> {
    let mut pairs = Vec::new();
    let mut comparisons = 0usize;

    for (i, first) in scenes.iter().enumerate() {
        for second in &scenes[i + 1..] {
            comparisons += 1;
            match check_pair(first, second, config) {
                Ok(()) => pairs.push(ScenePair {
                    first: first.clone(),
                    second: second.clone(),
                }),
                Err(reason) => {
                    debug!(a = %first.id, b = %second.id, %reason, "Rejected candidate pair");
                }
            }
        }
    }

    info!(
        scenes = scenes.len(),
        comparisons,
        pairs = pairs.len(),
        "Pair matching complete"
    );
    pairs
}

/// Number of candidate comparisons `find_pairs` makes over `n` scenes.
pub fn comparison_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
