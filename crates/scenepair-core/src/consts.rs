/// Minimum pixel count (rows*cols) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of bands every source raster must carry (R, G, B, alpha).
pub const REQUIRED_BAND_COUNT: usize = 4;

/// Index of the alpha band within a source raster.
pub const ALPHA_BAND: usize = 3;

/// Alpha value marking a pixel as imaged ground. Anything else is nodata.
pub const OPAQUE_ALPHA: u8 = 255;

/// Largest acquisition time difference (seconds, inclusive) for two scenes
/// to count as a pair.
pub const DEFAULT_MAX_TIME_GAP_SECS: f64 = 2.0;

/// Display duration of each animation frame in milliseconds.
pub const DEFAULT_FRAME_DELAY_MS: u16 = 500;

/// GIF quantiser speed. 1 is the slowest and highest quality setting.
pub const GIF_QUANTIZER_SPEED: i32 = 1;

/// Tolerance for orientation tests in footprint intersection.
pub const GEOMETRY_EPSILON: f64 = 1e-12;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;
