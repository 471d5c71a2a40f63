use std::path::{Path, PathBuf};

use gdal::Dataset;
use gdal::errors::GdalError;
use gdal::vector::LayerAccess;
use log::{debug, warn};

use super::{BoundaryError, BoundaryProvider};
use crate::boundary::GeometrySet;
use crate::crs::Crs;

/// Basin boundaries stored as `<boundary_dir>/<basin>/<basin>Boundaries.shp`.
#[derive(Debug, Clone)]
pub struct ShapefileBoundaries {
    boundary_dir: PathBuf,
}

impl ShapefileBoundaries {
    pub fn new<P: AsRef<Path>>(boundary_dir: P) -> Self {
        Self {
            boundary_dir: boundary_dir.as_ref().to_path_buf(),
        }
    }

    pub fn boundary_path(&self, basin: &str) -> PathBuf {
        self.boundary_dir
            .join(basin)
            .join(format!("{basin}Boundaries.shp"))
    }
}

impl BoundaryProvider for ShapefileBoundaries {
    fn load(&self, basin: &str) -> Result<GeometrySet, BoundaryError> {
        let path = self.boundary_path(basin);
        if !path.exists() {
            return Err(BoundaryError::NotFound {
                basin: basin.to_string(),
                path,
            });
        }

        read_boundary(&path)
    }
}

/// Reads every feature geometry of the first layer of a vector dataset.
pub fn read_boundary(path: &Path) -> Result<GeometrySet, BoundaryError> {
    let unreadable = |source: GdalError| BoundaryError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let dataset = Dataset::open(path).map_err(unreadable)?;
    let mut layer = dataset.layer(0).map_err(unreadable)?;
    let crs = layer
        .spatial_ref()
        .and_then(|srs| Crs::from_spatial_ref(srs).ok());

    let mut geometries = Vec::new();
    for (index, feature) in layer.features().enumerate() {
        let Some(geometry) = feature.geometry() else {
            warn!("Feature {index} of {} has no geometry", path.display());
            continue;
        };
        geometries.push(geometry.to_geo().map_err(unreadable)?);
    }

    let set = GeometrySet::from_geometries(geometries, crs);
    if set.is_empty() {
        return Err(BoundaryError::NoPolygons {
            path: path.to_path_buf(),
        });
    }

    debug!(
        "Loaded {} boundary polygons from {}",
        set.polygons().len(),
        path.display()
    );

    Ok(set)
}
