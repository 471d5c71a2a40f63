use log::{error, info, warn};

use super::outcome::{FileOutcome, SkipReason};
use crate::accumulator::{ClassCountTable, band_identity};
use crate::area::{AreaRow, to_area_rows};
use crate::boundary::GeometrySet;
use crate::classes::{ClassVocabulary, EXPECTED_EPSG, PIXEL_AREA_KM2};
use crate::config::Config;
use crate::counting::ClassCounter;
use crate::crs::{self, Crs};
use crate::masking::CropMask;
use crate::readers::RasterSource;

/// Process-wide constants shared by every basin run.
#[derive(Debug, Clone)]
pub struct AreaSettings {
    pub vocabulary: ClassVocabulary,
    pub expected_crs: Crs,
    pub pixel_area_km2: f64,
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            vocabulary: ClassVocabulary::wetlands(),
            expected_crs: Crs::epsg(EXPECTED_EPSG),
            pixel_area_km2: PIXEL_AREA_KM2,
        }
    }
}

impl From<&Config> for AreaSettings {
    fn from(config: &Config) -> Self {
        Self {
            vocabulary: config.classes().clone(),
            expected_crs: Crs::from(config.expected_crs().clone()),
            pixel_area_km2: config.pixel_area_km2(),
        }
    }
}

/// State of one basin between loading its boundary and exporting its rows.
///
/// Owns the basin's count table; rasters are folded in one at a time.
pub struct BasinRun<'a> {
    basin: &'a str,
    boundary: GeometrySet,
    settings: &'a AreaSettings,
    table: ClassCountTable,
    processed: usize,
    skipped: usize,
}

impl<'a> BasinRun<'a> {
    pub fn new(basin: &'a str, boundary: GeometrySet, settings: &'a AreaSettings) -> Self {
        if !crs::same_crs(boundary.crs(), Some(&settings.expected_crs)) {
            warn!(
                "Warning: Shapefile CRS for {basin} is {}, expected {}",
                crs::describe(boundary.crs()),
                settings.expected_crs
            );
        }

        Self {
            basin,
            boundary,
            settings,
            table: ClassCountTable::new(),
            processed: 0,
            skipped: 0,
        }
    }

    /// Checks, masks, counts and accumulates one raster.
    pub fn process_raster(&mut self, raster: &dyn RasterSource) -> FileOutcome {
        let outcome = match self.try_process_raster(raster) {
            Ok(bands) => FileOutcome::Accumulated { bands },
            Err(reason) => {
                match &reason {
                    SkipReason::CrsMismatch { .. } => {
                        error!("Error: {reason} ({} in {})", raster.name(), self.basin)
                    }
                    _ => warn!("Skipping {} in {}: {reason}", raster.name(), self.basin),
                }
                FileOutcome::Skipped(reason)
            }
        };

        self.record(&outcome);
        outcome
    }

    /// Counts a file that could not be opened as skipped.
    pub fn skip(&mut self, file: &str, reason: SkipReason) -> FileOutcome {
        warn!("Skipping {file} in {}: {reason}", self.basin);
        let outcome = FileOutcome::Skipped(reason);
        self.record(&outcome);
        outcome
    }

    fn try_process_raster(&mut self, raster: &dyn RasterSource) -> Result<usize, SkipReason> {
        let name = raster.name();

        if !crs::same_crs(raster.crs(), Some(&self.settings.expected_crs)) {
            warn!(
                "Warning: Raster {name} CRS is {}, expected {}",
                crs::describe(raster.crs()),
                self.settings.expected_crs
            );
        }

        if !crs::same_crs(raster.crs(), self.boundary.crs()) {
            return Err(SkipReason::CrsMismatch {
                raster: raster.crs().cloned(),
                boundary: self.boundary.crs().cloned(),
            });
        }

        let mask = CropMask::new(raster, &self.boundary)?;

        // all bands are read before any is folded
        let mut band_counts = Vec::with_capacity(raster.band_count());
        for band in 0..raster.band_count() {
            let mut counter = ClassCounter::new(raster.nodata());
            mask.read_band(raster, band, |values| counter.extend(values))?;
            band_counts.push(counter.finish());
        }

        for (index, counts) in band_counts.iter().enumerate() {
            let identity = band_identity(raster.band_description(index), index);
            self.table
                .fold(&identity, counts, &self.settings.vocabulary);
        }

        info!(
            "Accumulated {} bands of {name} ({} window)",
            band_counts.len(),
            mask.window()
        );

        Ok(band_counts.len())
    }

    fn record(&mut self, outcome: &FileOutcome) {
        if outcome.is_accumulated() {
            self.processed += 1;
        } else {
            self.skipped += 1;
        }
    }

    pub fn table(&self) -> &ClassCountTable {
        &self.table
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Converts the accumulated counts to area rows and ends the run.
    pub fn finish(self) -> Vec<AreaRow> {
        info!(
            "{}: {} files processed, {} skipped",
            self.basin, self.processed, self.skipped
        );
        to_area_rows(
            &self.table,
            &self.settings.vocabulary,
            self.settings.pixel_area_km2,
        )
    }
}
