//! Geo-aligned overlap compositing of two rasters.
//!
//! Both outputs come from the same masked windows: a false-colour GeoTIFF
//! raster (scene A red, scene B cyan) and a two-frame animation that
//! flickers between the scenes.

use image::{Rgba, RgbaImage};
use ndarray::{s, Array2, Array3, ArrayView2, Axis, Zip};
use tracing::debug;

use crate::consts::{
    ALPHA_BAND, DEFAULT_FRAME_DELAY_MS, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, OPAQUE_ALPHA,
    PARALLEL_PIXEL_THRESHOLD, REQUIRED_BAND_COUNT,
};
use crate::error::{Result, ScenePairError};
use crate::geo::{ground_bounds, intersect, to_pixel_window, GeoTransform, GroundRect, PixelWindow};
use crate::pipeline::config::FrameMode;
use crate::raster::{RasterImage, RasterSource};

/// Common footprint of two rasters, in ground space and in each raster's grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    pub ground: GroundRect,
    pub window_a: PixelWindow,
    pub window_b: PixelWindow,
    /// Shared window width in pixels.
    pub cols: usize,
    /// Shared window height in pixels.
    pub rows: usize,
    /// Output geotransform: raster A's grid with the origin at the window.
    pub geotransform: GeoTransform,
}

/// Two-frame looping animation, A before B.
#[derive(Clone, Debug)]
pub struct AnimatedFrames {
    pub frames: Vec<RgbaImage>,
    pub delay_ms: u16,
}

/// Everything a single composite call produces.
#[derive(Clone, Debug)]
pub struct CompositeOutput {
    pub overlap: Overlap,
    /// 0/1 validity mask, shape = (rows, cols)
    pub mask: Array2<u8>,
    pub composite: RasterImage,
    pub animation: AnimatedFrames,
}

/// Options for [`composite_with`].
#[derive(Clone, Copy, Debug)]
pub struct CompositeOptions {
    pub frame_mode: FrameMode,
    pub frame_delay_ms: u16,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            frame_mode: FrameMode::Rgba,
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
        }
    }
}

/// Compute the overlap of two rasters.
///
/// The two per-raster windows can disagree by a pixel after snapping; both
/// are trimmed to the smaller width and height so the sampled arrays line up.
pub fn find_overlap(a: &dyn RasterSource, b: &dyn RasterSource) -> Result<Overlap> {
    let gt_a = a.geotransform();
    let gt_b = b.geotransform();
    let bounds_a = ground_bounds(&gt_a, a.width(), a.height());
    let bounds_b = ground_bounds(&gt_b, b.width(), b.height());
    let ground = intersect(&bounds_a, &bounds_b);

    let mut window_a = to_pixel_window(&gt_a, &ground);
    let mut window_b = to_pixel_window(&gt_b, &ground);

    let cols = window_a.cols.min(window_b.cols);
    let rows = window_a.rows.min(window_b.rows);
    if cols <= 0 || rows <= 0 {
        return Err(ScenePairError::NoOverlap { cols, rows });
    }
    if window_a.cols != window_b.cols || window_a.rows != window_b.rows {
        debug!(
            a_cols = window_a.cols,
            a_rows = window_a.rows,
            b_cols = window_b.cols,
            b_rows = window_b.rows,
            "Overlap windows differ after snapping, trimming to common size"
        );
    }
    window_a.cols = cols;
    window_a.rows = rows;
    window_b.cols = cols;
    window_b.rows = rows;

    let origin = gt_a.pixel_to_ground(window_a.left as f64, window_a.top as f64);
    let geotransform =
        GeoTransform::north_up(origin.0, origin.1, gt_a.pixel_width, gt_a.pixel_height);

    debug!(?window_a, ?window_b, cols, rows, "Computed overlap window");

    Ok(Overlap {
        ground,
        window_a,
        window_b,
        cols: cols as usize,
        rows: rows as usize,
        geotransform,
    })
}

/// 1 where both alpha planes are fully opaque, 0 elsewhere.
pub fn validity_mask(alpha_a: ArrayView2<u8>, alpha_b: ArrayView2<u8>) -> Array2<u8> {
    let (rows, cols) = alpha_a.dim();
    let zip = Zip::from(alpha_a).and(alpha_b);
    let valid = |&a: &u8, &b: &u8| u8::from(a == OPAQUE_ALPHA && b == OPAQUE_ALPHA);
    if rows * cols >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_map_collect(valid)
    } else {
        zip.map_collect(valid)
    }
}

/// Zero every band wherever the mask is 0. Returns a new array.
pub fn apply_mask(pixels: &Array3<u8>, mask: &Array2<u8>) -> Array3<u8> {
    pixels * &mask.view().insert_axis(Axis(0))
}

/// Composite two 4-band rasters with default options.
pub fn composite(a: &dyn RasterSource, b: &dyn RasterSource) -> Result<CompositeOutput> {
    composite_with(a, b, &CompositeOptions::default())
}

/// Composite two 4-band rasters over their common footprint.
pub fn composite_with(
    a: &dyn RasterSource,
    b: &dyn RasterSource,
    options: &CompositeOptions,
) -> Result<CompositeOutput> {
    check_band_count(a)?;
    check_band_count(b)?;

    let overlap = find_overlap(a, b)?;

    let pixels_a = a.read_window(&overlap.window_a)?;
    let pixels_b = b.read_window(&overlap.window_b)?;

    let mask = validity_mask(
        pixels_a.index_axis(Axis(0), ALPHA_BAND),
        pixels_b.index_axis(Axis(0), ALPHA_BAND),
    );
    let masked_a = apply_mask(&pixels_a, &mask);
    let masked_b = apply_mask(&pixels_b, &mask);
    let alpha = &mask * OPAQUE_ALPHA;

    let composite = false_color(&masked_a, &masked_b, &alpha, overlap.geotransform, a.projection_wkt());
    let animation = AnimatedFrames {
        frames: vec![
            animation_frame(&masked_a, &alpha, options.frame_mode),
            animation_frame(&masked_b, &alpha, options.frame_mode),
        ],
        delay_ms: options.frame_delay_ms,
    };

    Ok(CompositeOutput {
        overlap,
        mask,
        composite,
        animation,
    })
}

fn check_band_count(raster: &dyn RasterSource) -> Result<()> {
    let found = raster.band_count();
    if found != REQUIRED_BAND_COUNT {
        return Err(ScenePairError::BandCountMismatch {
            expected: REQUIRED_BAND_COUNT,
            found,
        });
    }
    Ok(())
}

/// Band 1 = A red, bands 2 and 3 = B red, band 4 = mask alpha.
fn false_color(
    a: &Array3<u8>,
    b: &Array3<u8>,
    alpha: &Array2<u8>,
    geotransform: GeoTransform,
    projection: &str,
) -> RasterImage {
    let (rows, cols) = alpha.dim();
    let mut bands = Array3::<u8>::zeros((REQUIRED_BAND_COUNT, rows, cols));
    bands.slice_mut(s![0, .., ..]).assign(&a.slice(s![0, .., ..]));
    bands.slice_mut(s![1, .., ..]).assign(&b.slice(s![0, .., ..]));
    bands.slice_mut(s![2, .., ..]).assign(&b.slice(s![0, .., ..]));
    bands.slice_mut(s![3, .., ..]).assign(alpha);
    RasterImage::new(bands, geotransform, projection)
}

fn animation_frame(pixels: &Array3<u8>, alpha: &Array2<u8>, mode: FrameMode) -> RgbaImage {
    let (rows, cols) = alpha.dim();
    RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
        let (r, c) = (y as usize, x as usize);
        let red = pixels[[0, r, c]];
        let green = pixels[[1, r, c]];
        let blue = pixels[[2, r, c]];
        let a = alpha[[r, c]];
        match mode {
            FrameMode::Rgba => Rgba([red, green, blue, a]),
            FrameMode::Grayscale => {
                let luma = luminance(red, green, blue);
                Rgba([luma, luma, luma, a])
            }
        }
    })
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}
