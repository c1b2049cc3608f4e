//! Affine geotransform arithmetic between pixel and ground coordinates.
//!
//! All offset math assumes a north-up raster. Rotation coefficients are
//! carried through and used when projecting a pixel back to ground space,
//! but bounds and windows ignore them, so rotated rasters give approximate
//! results.

use serde::{Deserialize, Serialize};

/// Six-coefficient affine mapping, in GDAL order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation. `pixel_height` is usually negative.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    pub fn from_coefficients(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            col_rotation: c[4],
            pixel_height: c[5],
        }
    }

    pub fn coefficients(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    pub fn is_rotated(&self) -> bool {
        self.row_rotation != 0.0 || self.col_rotation != 0.0
    }

    /// Ground coordinate of the top-left corner of pixel (`col`, `row`).
    pub fn pixel_to_ground(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Same pixel size and rotation, origin moved to pixel (`col`, `row`).
    pub fn shifted(&self, col: i64, row: i64) -> Self {
        let (origin_x, origin_y) = self.pixel_to_ground(col as f64, row as f64);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }
}

/// Axis-aligned ground rectangle, stored in the (minX, maxY, maxX, minY)
/// order a north-up raster produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundRect {
    pub min_x: f64,
    pub max_y: f64,
    pub max_x: f64,
    pub min_y: f64,
}

/// Pixel window in one raster's own grid. `cols`/`rows` may be zero or
/// negative when derived from a degenerate intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelWindow {
    pub left: i64,
    pub top: i64,
    pub cols: i64,
    pub rows: i64,
}

impl PixelWindow {
    pub fn is_empty(&self) -> bool {
        self.cols <= 0 || self.rows <= 0
    }
}

/// Top-left and bottom-right ground corners of a `width` x `height` raster.
pub fn ground_bounds(gt: &GeoTransform, width: usize, height: usize) -> GroundRect {
    GroundRect {
        min_x: gt.origin_x,
        max_y: gt.origin_y,
        max_x: gt.origin_x + gt.pixel_width * width as f64,
        min_y: gt.origin_y + gt.pixel_height * height as f64,
    }
}

/// Componentwise intersection. An empty result is not rejected here; it
/// shows up as a non-positive window further down.
pub fn intersect(a: &GroundRect, b: &GroundRect) -> GroundRect {
    GroundRect {
        min_x: a.min_x.max(b.min_x),
        max_y: a.max_y.min(b.max_y),
        max_x: a.max_x.min(b.max_x),
        min_y: a.min_y.max(b.min_y),
    }
}

/// Snap a ground rectangle onto a raster's pixel grid.
///
/// Offsets are rounded half-to-even, so a window edge can land one pixel
/// off from the matching edge in another raster.
pub fn to_pixel_window(gt: &GeoTransform, rect: &GroundRect) -> PixelWindow {
    let snap_x = |x: f64| ((x - gt.origin_x) / gt.pixel_width).round_ties_even() as i64;
    let snap_y = |y: f64| ((y - gt.origin_y) / gt.pixel_height).round_ties_even() as i64;

    let left = snap_x(rect.min_x);
    let top = snap_y(rect.max_y);
    PixelWindow {
        left,
        top,
        cols: snap_x(rect.max_x) - left,
        rows: snap_y(rect.min_y) - top,
    }
}
