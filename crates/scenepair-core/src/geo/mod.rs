pub mod polygon;
pub mod window;

pub use polygon::rings_intersect;
pub use window::{ground_bounds, intersect, to_pixel_window, GeoTransform, GroundRect, PixelWindow};
