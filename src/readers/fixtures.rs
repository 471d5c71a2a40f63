//! Small GDAL datasets written to disk by tests.

use std::path::Path;

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{Geometry, LayerAccess, LayerOptions};
use gdal::{DriverManager, Metadata};

use super::GeoTransform;

/// Writes a `u8` GeoTIFF, one band per `(description, values)` pair.
pub fn write_geotiff(
    path: &Path,
    (width, height): (usize, usize),
    transform: GeoTransform,
    epsg: u32,
    nodata: Option<f64>,
    bands: &[(Option<&str>, Vec<u8>)],
) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<u8, _>(path, width, height, bands.len())
        .unwrap();
    dataset.set_geo_transform(&transform).unwrap();
    dataset
        .set_spatial_ref(&SpatialRef::from_epsg(epsg).unwrap())
        .unwrap();

    for (index, (description, values)) in bands.iter().enumerate() {
        let mut band = dataset.rasterband(index + 1).unwrap();
        band.set_no_data_value(nodata).unwrap();
        if let Some(description) = description {
            band.set_description(description).unwrap();
        }
        let mut buffer = Buffer::new((width, height), values.clone());
        band.write((0, 0), (width, height), &mut buffer).unwrap();
    }
}

/// Writes an ESRI Shapefile with one feature per WKT geometry.
pub fn write_shapefile(path: &Path, epsg: u32, geometries: &[&str]) {
    let driver = DriverManager::get_driver_by_name("ESRI Shapefile").unwrap();
    let mut dataset = driver.create_vector_only(path).unwrap();
    let srs = SpatialRef::from_epsg(epsg).unwrap();
    let name = path.file_stem().unwrap().to_string_lossy().to_string();

    let mut layer = dataset
        .create_layer(LayerOptions {
            name: &name,
            srs: Some(&srs),
            ..Default::default()
        })
        .unwrap();
    for wkt in geometries {
        layer
            .create_feature(Geometry::from_wkt(wkt).unwrap())
            .unwrap();
    }
}
