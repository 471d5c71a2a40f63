use geo::{BoundingRect, Geometry, MultiPolygon, Polygon, Rect};

use crate::crs::Crs;

/// Boundary polygons of one basin and the CRS they are expressed in.
#[derive(Debug, Clone)]
pub struct GeometrySet {
    polygons: MultiPolygon<f64>,
    crs: Option<Crs>,
}

impl GeometrySet {
    pub fn new(polygons: Vec<Polygon<f64>>, crs: Option<Crs>) -> Self {
        Self {
            polygons: MultiPolygon::new(polygons),
            crs,
        }
    }

    /// Keeps the polygonal parts of `geometries` in order; points and lines
    /// cannot cover pixels and are dropped.
    pub fn from_geometries<I>(geometries: I, crs: Option<Crs>) -> Self
    where
        I: IntoIterator<Item = Geometry<f64>>,
    {
        let mut polygons = Vec::new();
        for geometry in geometries {
            collect_polygons(geometry, &mut polygons);
        }

        Self::new(polygons, crs)
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons.0
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.polygons.bounding_rect()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.0.is_empty()
    }
}

fn collect_polygons(geometry: Geometry<f64>, polygons: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(polygon) => polygons.push(polygon),
        Geometry::MultiPolygon(multi) => polygons.extend(multi),
        Geometry::Rect(rect) => polygons.push(rect.to_polygon()),
        Geometry::Triangle(triangle) => polygons.push(triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                collect_polygons(geometry, polygons);
            }
        }
        _ => {}
    }
}
