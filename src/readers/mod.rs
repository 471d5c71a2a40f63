pub mod boundary;
#[cfg(test)]
pub mod fixtures;
pub mod gdal_raster;
#[cfg(test)]
pub mod memory;
pub mod types;
pub mod utils;

pub use boundary::ShapefileBoundaries;
pub use gdal_raster::{GdalRaster, GdalRasterProvider};
#[cfg(test)]
pub use memory::MemoryRaster;
pub use types::{
    BoundaryError, BoundaryProvider, GeoTransform, RasterProvider, RasterSource, ReadError, Window,
};
pub use utils::{is_supported_raster, list_raster_files};
