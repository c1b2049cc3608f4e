use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FRAME_DELAY_MS, DEFAULT_MAX_TIME_GAP_SECS};

/// Top-level configuration, loadable from TOML.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScenePairConfig {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ScenePairConfig {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Pair-matching thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Largest acquisition time difference, inclusive.
    pub max_time_gap_secs: f64,
    /// Require equal provider values in addition to satellite and strip ids.
    pub require_provider: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_time_gap_secs: DEFAULT_MAX_TIME_GAP_SECS,
            require_provider: true,
        }
    }
}

/// Pixel format of the animation frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMode {
    /// Full-colour frames, mask as alpha.
    #[default]
    Rgba,
    /// BT.601 luminance replicated into RGB, mask as alpha.
    Grayscale,
}

impl std::fmt::Display for FrameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgba => write!(f, "RGBA"),
            Self::Grayscale => write!(f, "Grayscale"),
        }
    }
}

/// Which artifacts to write and where.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Defaults to the first input's directory.
    pub output_dir: Option<PathBuf>,
    /// Write the false-colour composite GeoTIFF.
    pub write_composite: bool,
    /// Write the two-frame GIF.
    pub write_animation: bool,
    pub frame_mode: FrameMode,
    pub frame_delay_ms: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            write_composite: true,
            write_animation: true,
            frame_mode: FrameMode::default(),
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
        }
    }
}
