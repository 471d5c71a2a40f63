use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::Deserialize;

use crate::area::{AREA_COLUMNS, AreaRow};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot create output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error("cannot write {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes a basin's area rows somewhere.
pub trait AreaExporter {
    /// Returns the written path, or `None` when there was nothing to write.
    fn export(&self, basin: &str, rows: &[AreaRow]) -> Result<Option<PathBuf>, ExportError>;
}

/// File format of the per-basin area tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Writes `<output_dir>/wetlandAreas<basin>.<ext>` with the columns
/// `Model, Class, Pixel_Count, Area_km2`, in the configured format.
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl FileExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn output_path(&self, basin: &str) -> PathBuf {
        self.output_dir
            .join(format!("wetlandAreas{basin}.{}", self.format.extension()))
    }
}

impl AreaExporter for FileExporter {
    fn export(&self, basin: &str, rows: &[AreaRow]) -> Result<Option<PathBuf>, ExportError> {
        if rows.is_empty() {
            info!("Nothing to export for {basin}");
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_path(basin);
        match self.format {
            OutputFormat::Xlsx => write_xlsx(&path, rows).map_err(|source| ExportError::Xlsx {
                path: path.clone(),
                source,
            })?,
            OutputFormat::Csv => write_csv(&path, rows).map_err(|source| ExportError::Csv {
                path: path.clone(),
                source,
            })?,
        }

        Ok(Some(path))
    }
}

/// One worksheet, a header row, then one row per `AreaRow`.
fn write_xlsx(path: &Path, rows: &[AreaRow]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in AREA_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        worksheet.write_string(line, 0, &row.band)?;
        worksheet.write_string(line, 1, &row.class)?;
        worksheet.write_number(line, 2, row.pixel_count as f64)?;
        worksheet.write_number(line, 3, row.area_km2)?;
    }

    workbook.save(path)
}

fn write_csv(path: &Path, rows: &[AreaRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
