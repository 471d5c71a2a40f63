//! Crops a raster to the bounds of a basin boundary and blanks every pixel
//! whose centre falls outside the boundary polygons.
//!
//! Bands are read in strips of whole rows, so memory stays bounded by the
//! strip size rather than the size of the basin.

use geo::{Polygon, Rect};

use crate::boundary::GeometrySet;
use crate::readers::{GeoTransform, RasterSource, ReadError, Window};

/// Fill value for masked-out pixels when the raster declares no nodata.
pub const DEFAULT_FILL: f64 = 0.0;

/// Upper bound on the pixels of one strip (32 MiB of `f64`).
pub const STRIP_PIXELS: usize = 1 << 22;

#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("no boundary geometry to mask with")]
    EmptyGeometry,

    #[error("input shapes do not overlap raster")]
    NoOverlap,

    #[error("unsupported geotransform {0:?}: only north-up grids can be cropped")]
    UnsupportedTransform(GeoTransform),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// The crop window of one raster and the polygons that select its pixels.
#[derive(Debug, Clone)]
pub struct CropMask<'a> {
    transform: GeoTransform,
    window: Window,
    fill: f64,
    polygons: &'a [Polygon<f64>],
    strip_pixels: usize,
}

impl<'a> CropMask<'a> {
    /// Fails when the raster and the boundary share no pixel.
    pub fn new(raster: &dyn RasterSource, geometries: &'a GeometrySet) -> Result<Self, MaskError> {
        let bounds = geometries.bounds().ok_or(MaskError::EmptyGeometry)?;
        let transform = raster.geo_transform();
        let window = crop_window(&transform, raster.size(), bounds)?;

        Ok(Self {
            transform,
            window,
            fill: raster.nodata().unwrap_or(DEFAULT_FILL),
            polygons: geometries.polygons(),
            strip_pixels: STRIP_PIXELS,
        })
    }

    pub fn with_strip_pixels(mut self, strip_pixels: usize) -> Self {
        self.strip_pixels = strip_pixels.max(1);
        self
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn fill(&self) -> f64 {
        self.fill
    }

    /// Row strips covering the crop window, top to bottom.
    pub fn strips(&self) -> impl Iterator<Item = Window> + '_ {
        let rows = (self.strip_pixels / self.window.width.max(1)).max(1);
        let window = self.window;

        (0..window.height).step_by(rows).map(move |start| {
            Window::new(
                window.col_off,
                window.row_off + start,
                window.width,
                rows.min(window.height - start),
            )
        })
    }

    /// Feeds one band of the crop window to `visit`, strip by strip, with
    /// pixels outside the polygons set to the fill value.
    pub fn read_band<F>(
        &self,
        raster: &dyn RasterSource,
        band: usize,
        mut visit: F,
    ) -> Result<(), MaskError>
    where
        F: FnMut(&[f64]),
    {
        for strip in self.strips() {
            let mut values = raster.read_window(band, strip)?;
            let inside = rasterize(&self.transform, strip, self.polygons);
            for (value, keep) in values.iter_mut().zip(&inside) {
                if !keep {
                    *value = self.fill;
                }
            }
            visit(&values);
        }

        Ok(())
    }
}

/// Smallest pixel window covering `bounds`, clipped to the raster extent.
pub fn crop_window(
    transform: &GeoTransform,
    (width, height): (usize, usize),
    bounds: Rect<f64>,
) -> Result<Window, MaskError> {
    let [x0, dx, rot_x, y0, rot_y, dy] = *transform;
    if rot_x != 0.0 || rot_y != 0.0 || dx <= 0.0 || dy == 0.0 {
        return Err(MaskError::UnsupportedTransform(*transform));
    }

    let (min, max) = (bounds.min(), bounds.max());
    let cols = pixel_span((min.x - x0) / dx, (max.x - x0) / dx, width);
    let rows = pixel_span((min.y - y0) / dy, (max.y - y0) / dy, height);

    match (cols, rows) {
        (Some((col_off, col_end)), Some((row_off, row_end))) => Ok(Window::new(
            col_off,
            row_off,
            col_end - col_off,
            row_end - row_off,
        )),
        _ => Err(MaskError::NoOverlap),
    }
}

/// Pixel index range [start, end) covering the fractional positions `a` and
/// `b`, clipped to `[0, size)`; `None` when nothing is left.
fn pixel_span(a: f64, b: f64, size: usize) -> Option<(usize, usize)> {
    let start = a.min(b).floor().max(0.0);
    let end = a.max(b).ceil().min(size as f64);

    if start.is_nan() || end.is_nan() || start >= end {
        return None;
    }

    Some((start as usize, end as usize))
}

/// Marks the pixels of `window` whose centres lie inside any polygon.
///
/// Scanline fill with the even-odd rule inside each polygon, so holes are
/// excluded; polygons are combined by union.
pub fn rasterize(
    transform: &GeoTransform,
    window: Window,
    polygons: &[Polygon<f64>],
) -> Vec<bool> {
    let [x0, dx, _, y0, _, dy] = *transform;
    let mut inside = vec![false; window.len()];
    let mut crossings = Vec::new();

    for row in 0..window.height {
        let y = y0 + ((window.row_off + row) as f64 + 0.5) * dy;
        let line = &mut inside[row * window.width..(row + 1) * window.width];

        for polygon in polygons {
            crossings.clear();
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                for edge in ring.lines() {
                    let (a, b) = (edge.start, edge.end);
                    if (a.y <= y) != (b.y <= y) {
                        crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);

            for pair in crossings.chunks_exact(2) {
                // columns whose centre x is in [pair[0], pair[1])
                let first = ((pair[0] - x0) / dx - 0.5).ceil() - window.col_off as f64;
                let last = ((pair[1] - x0) / dx - 0.5).ceil() - window.col_off as f64;
                let first = first.max(0.0) as usize;
                let last = last.clamp(0.0, window.width as f64) as usize;
                if first < last {
                    line[first..last].fill(true);
                }
            }
        }
    }

    inside
}
