pub mod geotiff;
pub mod gif;
