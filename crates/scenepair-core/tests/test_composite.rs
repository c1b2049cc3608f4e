mod common;

use approx::assert_abs_diff_eq;
use ndarray::{s, Array2, Array3};

use common::{patterned_raster, solid_raster, utm_transform, UTM_10N};
use scenepair_core::composite::{
    apply_mask, composite, composite_with, find_overlap, validity_mask, CompositeOptions,
};
use scenepair_core::error::ScenePairError;
use scenepair_core::geo::{ground_bounds, PixelWindow};
use scenepair_core::pipeline::config::FrameMode;
use scenepair_core::raster::{RasterImage, RasterSource};

#[test]
fn test_identical_rasters_full_overlap() {
    let gt = utm_transform(500_000.0, 4_200_000.0);
    let a = patterned_raster(100, 100, gt);
    let b = patterned_raster(100, 100, gt);

    let out = composite(&a, &b).unwrap();
    assert_eq!(out.overlap.cols, 100);
    assert_eq!(out.overlap.rows, 100);
    assert_eq!(out.composite.width(), 100);
    assert_eq!(out.composite.height(), 100);
    assert!(out.mask.iter().all(|&m| m == 1));
    assert!(out
        .composite
        .bands
        .index_axis(ndarray::Axis(0), 3)
        .iter()
        .all(|&v| v == 255));
    assert_eq!(out.composite.geotransform, gt);
    assert_eq!(out.composite.projection, UTM_10N);
}

#[test]
fn test_false_color_band_assignment() {
    let gt = utm_transform(0.0, 300.0);
    let a = solid_raster(10, 10, [10, 20, 30, 255], gt);
    let b = solid_raster(10, 10, [40, 50, 60, 255], gt);

    let out = composite(&a, &b).unwrap();
    let bands = &out.composite.bands;
    assert!(bands.slice(s![0, .., ..]).iter().all(|&v| v == 10));
    assert!(bands.slice(s![1, .., ..]).iter().all(|&v| v == 40));
    assert!(bands.slice(s![2, .., ..]).iter().all(|&v| v == 40));
    assert!(bands.slice(s![3, .., ..]).iter().all(|&v| v == 255));
}

#[test]
fn test_disjoint_rasters_no_overlap() {
    let a = patterned_raster(10, 10, utm_transform(0.0, 300.0));
    let b = patterned_raster(10, 10, utm_transform(10_000.0, 300.0));
    match composite(&a, &b) {
        Err(ScenePairError::NoOverlap { cols, .. }) => assert!(cols <= 0),
        other => panic!("expected NoOverlap, got {:?}", other.map(|o| o.overlap)),
    }
}

#[test]
fn test_edge_touching_rasters_no_overlap() {
    // B starts exactly where A ends: zero-width intersection.
    let a = patterned_raster(10, 10, utm_transform(0.0, 300.0));
    let b = patterned_raster(10, 10, utm_transform(30.0, 300.0));
    assert!(matches!(
        composite(&a, &b),
        Err(ScenePairError::NoOverlap { cols: 0, .. })
    ));
}

#[test]
fn test_band_count_mismatch() {
    let gt = utm_transform(0.0, 300.0);
    let a = patterned_raster(10, 10, gt);
    let three_band = RasterImage::new(Array3::<u8>::zeros((3, 10, 10)), gt, UTM_10N);
    assert!(matches!(
        composite(&a, &three_band),
        Err(ScenePairError::BandCountMismatch {
            expected: 4,
            found: 3
        })
    ));
}

#[test]
fn test_offset_rasters_window_and_origin() {
    // B is shifted 10 px right and 5 px down relative to A.
    let gt_a = utm_transform(0.0, 300.0);
    let gt_b = utm_transform(30.0, 285.0);
    let a = patterned_raster(100, 100, gt_a);
    let b = patterned_raster(100, 100, gt_b);

    let out = composite(&a, &b).unwrap();
    let ov = out.overlap;
    assert_eq!(
        ov.window_a,
        PixelWindow {
            left: 10,
            top: 5,
            cols: 90,
            rows: 95
        }
    );
    assert_eq!(
        ov.window_b,
        PixelWindow {
            left: 0,
            top: 0,
            cols: 90,
            rows: 95
        }
    );
    assert_eq!(out.composite.geotransform.origin_x, 30.0);
    assert_eq!(out.composite.geotransform.origin_y, 285.0);

    // Composite red comes from A's window, green/blue from B's window.
    let bands = &out.composite.bands;
    assert_eq!(bands[[0, 0, 0]], a.bands[[0, 5, 10]]);
    assert_eq!(bands[[1, 0, 0]], b.bands[[0, 0, 0]]);
    assert_eq!(bands[[2, 3, 7]], b.bands[[0, 3, 7]]);
}

#[test]
fn test_output_bounds_reproduce_intersection() {
    let a = patterned_raster(120, 80, utm_transform(1_000.0, 9_000.0));
    let b = patterned_raster(90, 110, utm_transform(1_045.0, 8_970.0));

    let out = composite(&a, &b).unwrap();
    let bounds = ground_bounds(
        &out.composite.geotransform,
        out.composite.width(),
        out.composite.height(),
    );
    let pixel = 3.0;
    assert_abs_diff_eq!(bounds.min_x, out.overlap.ground.min_x, epsilon = pixel);
    assert_abs_diff_eq!(bounds.max_x, out.overlap.ground.max_x, epsilon = pixel);
    assert_abs_diff_eq!(bounds.min_y, out.overlap.ground.min_y, epsilon = pixel);
    assert_abs_diff_eq!(bounds.max_y, out.overlap.ground.max_y, epsilon = pixel);
}

#[test]
fn test_mask_requires_both_alphas_opaque() {
    let gt = utm_transform(0.0, 300.0);
    let mut a = patterned_raster(4, 4, gt);
    let mut b = patterned_raster(4, 4, gt);
    a.bands[[3, 0, 0]] = 0;
    a.bands[[3, 1, 1]] = 254;
    b.bands[[3, 2, 2]] = 0;

    let out = composite(&a, &b).unwrap();
    for row in 0..4 {
        for col in 0..4 {
            let expected = !matches!((row, col), (0, 0) | (1, 1) | (2, 2));
            assert_eq!(out.mask[[row, col]] == 1, expected, "mask at ({row},{col})");
            if !expected {
                for band in 0..4 {
                    assert_eq!(out.composite.bands[[band, row, col]], 0);
                }
                for frame in &out.animation.frames {
                    assert_eq!(frame.get_pixel(col as u32, row as u32).0, [0, 0, 0, 0]);
                }
            }
        }
    }
}

#[test]
fn test_validity_mask_and_apply_mask_are_pure() {
    let alpha_a = Array2::from_shape_vec((2, 2), vec![255u8, 255, 0, 255]).unwrap();
    let alpha_b = Array2::from_shape_vec((2, 2), vec![255u8, 10, 255, 255]).unwrap();
    let mask = validity_mask(alpha_a.view(), alpha_b.view());
    assert_eq!(mask, Array2::from_shape_vec((2, 2), vec![1u8, 0, 0, 1]).unwrap());

    let pixels = Array3::<u8>::from_elem((4, 2, 2), 77);
    let masked = apply_mask(&pixels, &mask);
    assert!(pixels.iter().all(|&v| v == 77));
    assert_eq!(masked[[0, 0, 0]], 77);
    assert_eq!(masked[[3, 0, 1]], 0);
    assert_eq!(masked[[2, 1, 0]], 0);
    assert_eq!(masked[[1, 1, 1]], 77);
}

#[test]
fn test_large_mask_parallel_path() {
    let rows = 300;
    let cols = 300;
    let alpha_a = Array2::<u8>::from_elem((rows, cols), 255);
    let mut alpha_b = Array2::<u8>::from_elem((rows, cols), 255);
    alpha_b[[150, 150]] = 0;
    let mask = validity_mask(alpha_a.view(), alpha_b.view());
    assert_eq!(mask.iter().filter(|&&m| m == 0).count(), 1);
    assert_eq!(mask[[150, 150]], 0);
}

#[test]
fn test_animation_frames_rgba() {
    let gt = utm_transform(0.0, 300.0);
    let a = solid_raster(6, 4, [10, 20, 30, 255], gt);
    let b = solid_raster(6, 4, [40, 50, 60, 255], gt);

    let out = composite(&a, &b).unwrap();
    assert_eq!(out.animation.frames.len(), 2);
    assert_eq!(out.animation.delay_ms, 500);
    assert_eq!(out.animation.frames[0].dimensions(), (6, 4));
    assert_eq!(out.animation.frames[0].get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(out.animation.frames[1].get_pixel(5, 3).0, [40, 50, 60, 255]);
}

#[test]
fn test_animation_frames_grayscale() {
    let gt = utm_transform(0.0, 300.0);
    let a = solid_raster(2, 2, [255, 0, 0, 255], gt);
    let b = solid_raster(2, 2, [255, 255, 255, 255], gt);

    let options = CompositeOptions {
        frame_mode: FrameMode::Grayscale,
        frame_delay_ms: 250,
    };
    let out = composite_with(&a, &b, &options).unwrap();
    assert_eq!(out.animation.delay_ms, 250);
    assert_eq!(out.animation.frames[0].get_pixel(0, 0).0, [76, 76, 76, 255]);
    assert_eq!(out.animation.frames[1].get_pixel(1, 1).0, [255, 255, 255, 255]);
}

#[test]
fn test_find_overlap_trims_to_common_size() {
    // Half-pixel offset makes the two snapped windows disagree by one pixel.
    let a = patterned_raster(11, 10, utm_transform(0.0, 30.0));
    let b = patterned_raster(10, 10, utm_transform(4.5, 30.0));
    let ov = find_overlap(&a, &b).unwrap();
    assert_eq!(ov.cols, 9);
    assert_eq!(ov.rows, 10);
    assert_eq!(ov.window_a.cols, ov.window_b.cols);
    assert_eq!(ov.window_a.rows, ov.window_b.rows);
    assert_eq!(ov.cols as i64, ov.window_a.cols);
    assert!(a.read_window(&ov.window_a).is_ok());
    assert!(b.read_window(&ov.window_b).is_ok());
}

#[test]
fn test_read_window_out_of_bounds() {
    let raster = patterned_raster(10, 10, utm_transform(0.0, 30.0));
    let window = PixelWindow {
        left: 5,
        top: 5,
        cols: 6,
        rows: 2,
    };
    assert!(matches!(
        raster.read_window(&window),
        Err(ScenePairError::WindowOutOfBounds { .. })
    ));
    let negative = PixelWindow {
        left: -1,
        top: 0,
        cols: 2,
        rows: 2,
    };
    assert!(raster.read_window(&negative).is_err());
}
