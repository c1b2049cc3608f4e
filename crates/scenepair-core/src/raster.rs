use ndarray::{s, Array3};

use crate::error::{Result, ScenePairError};
use crate::geo::{GeoTransform, PixelWindow};

/// Read access to a georeferenced 8-bit raster.
pub trait RasterSource {
    fn geotransform(&self) -> GeoTransform;

    /// Spatial reference as WKT (or any CRS descriptor the codec produced).
    fn projection_wkt(&self) -> &str;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn band_count(&self) -> usize;

    /// Read all bands of a window, shaped (bands, rows, cols).
    ///
    /// Windows that reach outside the raster are rejected, never padded.
    fn read_window(&self, window: &PixelWindow) -> Result<Array3<u8>>;
}

/// In-memory georeferenced raster.
#[derive(Clone, Debug)]
pub struct RasterImage {
    /// Pixel planes, shape = (bands, height, width)
    pub bands: Array3<u8>,
    pub geotransform: GeoTransform,
    pub projection: String,
}

impl RasterImage {
    pub fn new(bands: Array3<u8>, geotransform: GeoTransform, projection: impl Into<String>) -> Self {
        Self {
            bands,
            geotransform,
            projection: projection.into(),
        }
    }

    /// Build from pixel-interleaved samples (row-major, `band_count` per pixel).
    pub fn from_interleaved(
        samples: &[u8],
        width: usize,
        height: usize,
        band_count: usize,
        geotransform: GeoTransform,
        projection: impl Into<String>,
    ) -> Result<Self> {
        let expected = width * height * band_count;
        if samples.len() != expected {
            return Err(ScenePairError::MalformedRaster(format!(
                "expected {expected} samples for {width}x{height}x{band_count}, got {}",
                samples.len()
            )));
        }
        let hwc = Array3::from_shape_vec((height, width, band_count), samples.to_vec())
            .map_err(|e| ScenePairError::MalformedRaster(e.to_string()))?;
        let bands = hwc.permuted_axes([2, 0, 1]).as_standard_layout().to_owned();
        Ok(Self::new(bands, geotransform, projection))
    }

    /// Pixel-interleaved samples, row-major.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let (bands, height, width) = self.bands.dim();
        let mut out = Vec::with_capacity(bands * height * width);
        for row in 0..height {
            for col in 0..width {
                for band in 0..bands {
                    out.push(self.bands[[band, row, col]]);
                }
            }
        }
        out
    }
}

impl RasterSource for RasterImage {
    fn geotransform(&self) -> GeoTransform {
        self.geotransform
    }

    fn projection_wkt(&self) -> &str {
        &self.projection
    }

    fn width(&self) -> usize {
        self.bands.dim().2
    }

    fn height(&self) -> usize {
        self.bands.dim().1
    }

    fn band_count(&self) -> usize {
        self.bands.dim().0
    }

    fn read_window(&self, window: &PixelWindow) -> Result<Array3<u8>> {
        let (width, height) = (self.width(), self.height());
        let out_of_bounds = window.left < 0
            || window.top < 0
            || window.cols <= 0
            || window.rows <= 0
            || window.left + window.cols > width as i64
            || window.top + window.rows > height as i64;
        if out_of_bounds {
            return Err(ScenePairError::WindowOutOfBounds {
                left: window.left,
                top: window.top,
                cols: window.cols,
                rows: window.rows,
                width,
                height,
            });
        }

        let (left, top) = (window.left as usize, window.top as usize);
        let (cols, rows) = (window.cols as usize, window.rows as usize);
        Ok(self
            .bands
            .slice(s![.., top..top + rows, left..left + cols])
            .to_owned())
    }
}
