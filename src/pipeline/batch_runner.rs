use std::path::{Path, PathBuf};

use log::{error, info};

use super::outcome::{BasinError, BasinOutcome, BatchReport, SkipReason};
use super::processor::{AreaSettings, BasinRun};
use crate::area::AreaRow;
use crate::config::Config;
use crate::export::{AreaExporter, FileExporter};
use crate::readers::{BoundaryProvider, GdalRasterProvider, RasterProvider, ShapefileBoundaries};

/// Runs every configured basin in order, one after the other.
///
/// A basin that fails is reported in the [`BatchReport`] and never stops the
/// remaining basins.
#[derive(Debug)]
pub struct BatchRunner<B, R, E> {
    basins: Vec<String>,
    settings: AreaSettings,
    boundaries: B,
    rasters: R,
    exporter: E,
}

impl BatchRunner<ShapefileBoundaries, GdalRasterProvider, FileExporter> {
    pub fn from_config(config: &Config) -> Self {
        BatchRunner::new(
            config.basins().to_vec(),
            AreaSettings::from(config),
            ShapefileBoundaries::new(config.boundary_dir()),
            GdalRasterProvider::new(config.raster_dir(), config.extensions().to_vec()),
            FileExporter::new(config.output_dir(), config.output_format()),
        )
    }
}

impl<B, R, E> BatchRunner<B, R, E>
where
    B: BoundaryProvider,
    R: RasterProvider,
    E: AreaExporter,
{
    pub fn new(
        basins: Vec<String>,
        settings: AreaSettings,
        boundaries: B,
        rasters: R,
        exporter: E,
    ) -> Self {
        Self {
            basins,
            settings,
            boundaries,
            rasters,
            exporter,
        }
    }

    pub fn run(&self) -> BatchReport {
        let mut report = BatchReport::default();

        for basin in &self.basins {
            let outcome = self.process_basin(basin);
            report.basins.push((basin.clone(), outcome));
        }

        report
    }

    pub fn process_basin(&self, basin: &str) -> BasinOutcome {
        info!("Processing basin: {basin}...");

        match self.try_process_basin(basin) {
            Ok(Some((rows, path))) => {
                info!(
                    "Saved {basin} wetland area estimates to {}",
                    path.display()
                );
                BasinOutcome::Exported { rows, path }
            }
            Ok(None) => {
                info!("No data processed for {basin}");
                BasinOutcome::Empty
            }
            Err(e) => {
                error!("Failed to process {basin}: {e}");
                BasinOutcome::Aborted(e)
            }
        }
    }

    fn try_process_basin(
        &self,
        basin: &str,
    ) -> Result<Option<(Vec<AreaRow>, PathBuf)>, BasinError> {
        let boundary = self.boundaries.load(basin)?;
        let files = self.rasters.list(basin)?;
        info!("Found {} raster files for {basin}", files.len());

        let mut run = BasinRun::new(basin, boundary, &self.settings);
        for path in &files {
            match self.rasters.open(path) {
                // the dataset is closed when `raster` goes out of scope
                Ok(raster) => run.process_raster(raster.as_ref()),
                Err(e) => run.skip(&file_name(path), SkipReason::Unreadable(e)),
            };
        }

        let rows = run.finish();
        if rows.is_empty() {
            return Ok(None);
        }

        let written = self.exporter.export(basin, &rows)?;
        Ok(written.map(|path| (rows, path)))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
