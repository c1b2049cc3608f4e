#![allow(dead_code)]

use ndarray::Array3;
use serde_json::{json, Value};

use scenepair_core::geo::GeoTransform;
use scenepair_core::raster::RasterImage;

pub const UTM_10N: &str = r#"PROJCS["WGS 84 / UTM zone 10N",AUTHORITY["EPSG","32610"]]"#;

/// Build a 4-band raster whose red band encodes `row * 10 + col` (mod 256),
/// green = 100, blue = 200, and a fully opaque alpha band.
pub fn patterned_raster(width: usize, height: usize, gt: GeoTransform) -> RasterImage {
    let mut bands = Array3::<u8>::zeros((4, height, width));
    for row in 0..height {
        for col in 0..width {
            bands[[0, row, col]] = ((row * 10 + col) % 256) as u8;
            bands[[1, row, col]] = 100;
            bands[[2, row, col]] = 200;
            bands[[3, row, col]] = 255;
        }
    }
    RasterImage::new(bands, gt, UTM_10N)
}

/// Uniform 4-band raster with the given RGBA value everywhere.
pub fn solid_raster(width: usize, height: usize, rgba: [u8; 4], gt: GeoTransform) -> RasterImage {
    let mut bands = Array3::<u8>::zeros((4, height, width));
    for (band, value) in rgba.iter().enumerate() {
        bands.index_axis_mut(ndarray::Axis(0), band).fill(*value);
    }
    RasterImage::new(bands, gt, UTM_10N)
}

/// North-up transform with 3 m pixels.
pub fn utm_transform(origin_x: f64, origin_y: f64) -> GeoTransform {
    GeoTransform::north_up(origin_x, origin_y, 3.0, -3.0)
}

/// Axis-aligned square polygon geometry, closed ring.
pub fn square_polygon(lon: f64, lat: f64, size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon, lat],
            [lon + size, lat],
            [lon + size, lat + size],
            [lon, lat + size],
            [lon, lat]
        ]]
    })
}

/// A catalog feature with the given identity and time.
pub fn feature(id: &str, satellite: &str, strip: &str, acquired: &str, geometry: Value) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "properties": {
            "satellite_id": satellite,
            "strip_id": strip,
            "provider": "planetscope",
            "acquired": acquired
        },
        "geometry": geometry
    })
}
