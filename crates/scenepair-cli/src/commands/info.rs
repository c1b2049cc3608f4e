use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use scenepair_core::geo::ground_bounds;
use scenepair_core::io::geotiff::read_geotiff;
use scenepair_core::raster::RasterSource;

#[derive(Args)]
pub struct InfoArgs {
    /// Input GeoTIFF file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let raster = read_geotiff(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let gt = raster.geotransform();
    let bounds = ground_bounds(&gt, raster.width(), raster.height());

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", raster.width(), raster.height());
    println!("Bands:       {}", raster.band_count());
    println!("Origin:      ({}, {})", gt.origin_x, gt.origin_y);
    println!("Pixel size:  ({}, {})", gt.pixel_width, gt.pixel_height);
    if gt.is_rotated() {
        println!("Rotation:    ({}, {})", gt.row_rotation, gt.col_rotation);
    }
    println!(
        "Bounds:      x {} .. {}, y {} .. {}",
        bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    );
    if raster.projection_wkt().is_empty() {
        println!("Projection:  (none)");
    } else {
        println!("Projection:  {}", raster.projection_wkt());
    }

    Ok(())
}
