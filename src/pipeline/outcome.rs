use std::path::PathBuf;

use crate::area::AreaRow;
use crate::crs::{self, Crs};
use crate::export::ExportError;
use crate::masking::MaskError;
use crate::readers::{BoundaryError, ReadError};

/// Why a raster file contributed nothing to its basin.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("cannot read raster: {0}")]
    Unreadable(#[from] ReadError),

    #[error(
        "CRS mismatch - Raster: {}, Shapefile: {}",
        crs::describe(.raster.as_ref()),
        crs::describe(.boundary.as_ref())
    )]
    CrsMismatch {
        raster: Option<Crs>,
        boundary: Option<Crs>,
    },

    #[error("{0}")]
    Masking(#[from] MaskError),
}

#[derive(Debug)]
pub enum FileOutcome {
    /// Counts of `bands` bands were folded into the basin table
    Accumulated { bands: usize },
    Skipped(SkipReason),
}

impl FileOutcome {
    pub fn is_accumulated(&self) -> bool {
        matches!(self, FileOutcome::Accumulated { .. })
    }
}

/// Failures that abort a whole basin.
#[derive(Debug, thiserror::Error)]
pub enum BasinError {
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Listing(#[from] ReadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug)]
pub enum BasinOutcome {
    Exported { rows: Vec<AreaRow>, path: PathBuf },
    /// No file was processed successfully, so nothing was written
    Empty,
    Aborted(BasinError),
}

/// What happened to every basin of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub basins: Vec<(String, BasinOutcome)>,
}

impl BatchReport {
    pub fn exported(&self) -> usize {
        self.count(|o| matches!(o, BasinOutcome::Exported { .. }))
    }

    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, BasinOutcome::Empty))
    }

    pub fn aborted(&self) -> usize {
        self.count(|o| matches!(o, BasinOutcome::Aborted(_)))
    }

    pub fn outcome(&self, basin: &str) -> Option<&BasinOutcome> {
        self.basins
            .iter()
            .find(|(name, _)| name == basin)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, predicate: impl Fn(&BasinOutcome) -> bool) -> usize {
        self.basins.iter().filter(|(_, o)| predicate(o)).count()
    }
}
