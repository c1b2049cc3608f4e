pub mod catalog;
pub mod composite;
pub mod consts;
pub mod error;
pub mod geo;
pub mod io;
pub mod matcher;
pub mod pipeline;
pub mod raster;
pub mod scene;
