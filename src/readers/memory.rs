use super::{GeoTransform, RasterSource, ReadError, Window};
use crate::crs::Crs;

#[derive(Debug, Clone)]
struct MemoryBand {
    description: Option<String>,
    values: Vec<f64>,
}

/// A raster held entirely in memory.
///
/// Bands are row-major and must all have `width * height` values.
#[derive(Debug, Clone)]
pub struct MemoryRaster {
    name: String,
    width: usize,
    height: usize,
    geo_transform: GeoTransform,
    crs: Option<Crs>,
    nodata: Option<f64>,
    bands: Vec<MemoryBand>,
}

impl MemoryRaster {
    pub fn new(name: &str, width: usize, height: usize, geo_transform: GeoTransform) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            geo_transform,
            crs: None,
            nodata: None,
            bands: Vec::new(),
        }
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn with_band(mut self, description: Option<&str>, values: Vec<f64>) -> Self {
        self.bands.push(MemoryBand {
            description: description.map(str::to_string),
            values,
        });
        self
    }
}

impl RasterSource for MemoryRaster {
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
        self.bands.len()
    }

    fn band_description(&self, band: usize) -> Option<&str> {
        self.bands
            .get(band)
            .and_then(|b| b.description.as_deref())
            .filter(|d| !d.is_empty())
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    fn read_window(&self, band: usize, window: Window) -> Result<Vec<f64>, ReadError> {
        let data = self.bands.get(band).ok_or_else(|| ReadError::BandOutOfRange {
            name: self.name.clone(),
            band,
            count: self.bands.len(),
        })?;

        if !window.fits(self.size()) || data.values.len() != self.width * self.height {
            return Err(ReadError::WindowOutOfBounds {
                name: self.name.clone(),
                window,
            });
        }

        let mut values = Vec::with_capacity(window.len());
        for row in window.row_off..window.row_off + window.height {
            let start = row * self.width + window.col_off;
            values.extend_from_slice(&data.values[start..start + window.width]);
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> MemoryRaster {
        let values = (0..12).map(f64::from).collect();
        MemoryRaster::new("grid.tif", 4, 3, [0.0, 1.0, 0.0, 3.0, 0.0, -1.0])
            .with_band(Some(""), values)
    }

    #[test]
    fn test_read_window_is_row_major() {
        let raster = raster();
        let values = raster.read_window(0, Window::new(1, 1, 2, 2)).unwrap();

        assert_eq!(values, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_read_window_rejects_bad_requests() {
        let raster = raster();

        assert!(matches!(
            raster.read_window(0, Window::new(3, 0, 2, 1)),
            Err(ReadError::WindowOutOfBounds { .. })
        ));
        assert!(matches!(
            raster.read_window(1, Window::new(0, 0, 1, 1)),
            Err(ReadError::BandOutOfRange { count: 1, .. })
        ));
    }

    #[test]
    fn test_empty_description_is_absent() {
        assert_eq!(raster().band_description(0), None);
    }
}
