use std::fmt;
use std::path::{Path, PathBuf};

use gdal::errors::GdalError;

use crate::boundary::GeometrySet;
use crate::crs::Crs;

/// GDAL-style affine transform:
/// `[top_left_x, pixel_width, row_rotation, top_left_y, column_rotation, pixel_height]`
pub type GeoTransform = [f64; 6];

/// Read access to a classified raster.
///
/// Band indices are 0-based.
pub trait RasterSource {
    fn name(&self) -> &str;
    fn crs(&self) -> Option<&Crs>;
    fn nodata(&self) -> Option<f64>;
    fn band_count(&self) -> usize;
    fn band_description(&self, band: usize) -> Option<&str>;
    /// (width, height) in pixels
    fn size(&self) -> (usize, usize);
    fn geo_transform(&self) -> GeoTransform;
    /// Reads one band's pixels inside `window`, row-major.
    fn read_window(&self, band: usize, window: Window) -> Result<Vec<f64>, ReadError>;
}

/// Lists and opens the raster files of a basin.
pub trait RasterProvider {
    fn list(&self, basin: &str) -> Result<Vec<PathBuf>, ReadError>;
    fn open(&self, path: &Path) -> Result<Box<dyn RasterSource>, ReadError>;
}

/// Resolves a basin name to its boundary polygons.
pub trait BoundaryProvider {
    fn load(&self, basin: &str) -> Result<GeometrySet, BoundaryError>;
}

/// Pixel window of a raster: offsets and extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub col_off: usize,
    pub row_off: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(col_off: usize, row_off: usize, width: usize, height: usize) -> Self {
        Self {
            col_off,
            row_off,
            width,
            height,
        }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fits(&self, (width, height): (usize, usize)) -> bool {
        self.col_off + self.width <= width && self.row_off + self.height <= height
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.col_off, self.row_off
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to open raster {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: GdalError,
    },

    #[error("failed to read band {band} of {name}")]
    Band {
        name: String,
        band: usize,
        #[source]
        source: GdalError,
    },

    #[error("band {band} out of range: {name} has {count} bands")]
    BandOutOfRange {
        name: String,
        band: usize,
        count: usize,
    },

    #[error("window {window} exceeds the extent of {name}")]
    WindowOutOfBounds { name: String, window: Window },

    #[error("cannot list raster directory {path}")]
    Listing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Any of these means the basin's boundary could not be used.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error("boundary for basin {basin} not found: {path}")]
    NotFound { basin: String, path: PathBuf },

    #[error("failed to read boundary {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: GdalError,
    },

    #[error("boundary {path} contains no polygon geometry")]
    NoPolygons { path: PathBuf },
}
