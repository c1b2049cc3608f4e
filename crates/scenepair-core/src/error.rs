use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenePairError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("TIFF error: {0}")]
    TiffError(#[from] tiff::TiffError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene metadata: {0}")]
    InvalidMetadata(String),

    #[error("Rasters do not overlap (window {cols}x{rows})")]
    NoOverlap { cols: i64, rows: i64 },

    #[error("Expected {expected} raster bands, found {found}")]
    BandCountMismatch { expected: usize, found: usize },

    #[error("Malformed raster: {0}")]
    MalformedRaster(String),

    #[error(
        "Window ({left},{top} {cols}x{rows}) exceeds raster dimensions ({width}x{height})"
    )]
    WindowOutOfBounds {
        left: i64,
        top: i64,
        cols: i64,
        rows: i64,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, ScenePairError>;
