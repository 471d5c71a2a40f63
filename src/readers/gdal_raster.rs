use std::path::{Path, PathBuf};

use gdal::errors::GdalError;
use gdal::{Dataset, Metadata};
use log::debug;

use super::utils::list_raster_files;
use super::{GeoTransform, RasterProvider, RasterSource, ReadError, Window};
use crate::crs::{self, Crs};

/// A raster file opened through GDAL (GeoTIFF, ERDAS Imagine, ...).
///
/// The dataset handle lives as long as the value and is closed on drop.
pub struct GdalRaster {
    name: String,
    dataset: Dataset,
    crs: Option<Crs>,
    nodata: Option<f64>,
    descriptions: Vec<Option<String>>,
}

impl GdalRaster {
    pub fn open(path: &Path) -> Result<Self, ReadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let dataset = Dataset::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let crs = dataset
            .spatial_ref()
            .and_then(Crs::from_spatial_ref)
            .ok();

        let band_count = dataset.raster_count();
        let mut descriptions = Vec::with_capacity(band_count);
        let mut nodata = None;

        for index in 1..=band_count {
            let band = dataset
                .rasterband(index)
                .map_err(|source| ReadError::Band {
                    name: name.clone(),
                    band: index - 1,
                    source,
                })?;

            // The dataset-level nodata is the first band's
            if index == 1 {
                nodata = band.no_data_value();
            }
            descriptions.push(band.description().ok().filter(|d| !d.is_empty()));
        }

        let (width, height) = dataset.raster_size();
        debug!(
            "Opened {name}: {width}x{height}, {band_count} bands, CRS {}, nodata {nodata:?}",
            crs::describe(crs.as_ref())
        );

        Ok(Self {
            name,
            dataset,
            crs,
            nodata,
            descriptions,
        })
    }
}

impl RasterSource for GdalRaster {
    fn name(&self) -> &str {
        &self.name
    }

    fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn band_count(&self) -> usize {
        self.descriptions.len()
    }

    fn band_description(&self, band: usize) -> Option<&str> {
        self.descriptions.get(band).and_then(|d| d.as_deref())
    }

    fn size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    fn geo_transform(&self) -> GeoTransform {
        // GDAL's default for rasters without georeferencing
        self.dataset
            .geo_transform()
            .unwrap_or([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    fn read_window(&self, band: usize, window: Window) -> Result<Vec<f64>, ReadError> {
        if band >= self.band_count() {
            return Err(ReadError::BandOutOfRange {
                name: self.name.clone(),
                band,
                count: self.band_count(),
            });
        }
        if !window.fits(self.size()) {
            return Err(ReadError::WindowOutOfBounds {
                name: self.name.clone(),
                window,
            });
        }

        let to_read_error = |source: GdalError| ReadError::Band {
            name: self.name.clone(),
            band,
            source,
        };

        let rasterband = self.dataset.rasterband(band + 1).map_err(to_read_error)?;
        let buffer = rasterband
            .read_as::<f64>(
                (window.col_off as isize, window.row_off as isize),
                (window.width, window.height),
                (window.width, window.height),
                None,
            )
            .map_err(to_read_error)?;

        Ok(buffer.data().to_vec())
    }
}

/// Raster files laid out as `<raster_dir>/<basin>/*.<ext>`.
#[derive(Debug, Clone)]
pub struct GdalRasterProvider {
    raster_dir: PathBuf,
    extensions: Vec<String>,
}

impl GdalRasterProvider {
    pub fn new<P: AsRef<Path>>(raster_dir: P, extensions: Vec<String>) -> Self {
        Self {
            raster_dir: raster_dir.as_ref().to_path_buf(),
            extensions,
        }
    }

    pub fn input_dir(&self, basin: &str) -> PathBuf {
        self.raster_dir.join(basin)
    }
}

impl RasterProvider for GdalRasterProvider {
    fn list(&self, basin: &str) -> Result<Vec<PathBuf>, ReadError> {
        list_raster_files(&self.input_dir(basin), &self.extensions)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn RasterSource>, ReadError> {
        Ok(Box::new(GdalRaster::open(path)?))
    }
}
