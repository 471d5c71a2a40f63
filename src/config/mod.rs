use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::classes::{ClassCode, ClassVocabulary, EXPECTED_EPSG, PIXEL_AREA_KM2};
use crate::crs::CrsId;
use crate::export::OutputFormat;

pub mod error;
pub use error::ConfigError;

pub const DEFAULT_EXTENSIONS: [&str; 2] = ["tif", "img"];

#[derive(Debug, Clone)]
pub struct Config {
    basins: Vec<String>,
    boundary_dir: PathBuf,
    raster_dir: PathBuf,
    output_dir: PathBuf,
    output_format: OutputFormat,
    expected_crs: CrsId,
    pixel_area_km2: f64,
    extensions: Vec<String>,
    classes: ClassVocabulary,
}

// Deserializes through a helper so that defaults are filled in and the basin
// list, pixel area, extensions and class vocabulary are validated up front.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            basins: Vec<String>,
            boundary_dir: PathBuf,
            raster_dir: PathBuf,
            output_dir: PathBuf,
            #[serde(default)]
            output_format: OutputFormat,
            expected_crs: Option<CrsId>,
            pixel_area_km2: Option<f64>,
            extensions: Option<Vec<String>>,
            classes: Option<BTreeMap<ClassCode, String>>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        validate_basins(&helper.basins).map_err(D::Error::custom)?;

        let pixel_area_km2 = helper.pixel_area_km2.unwrap_or(PIXEL_AREA_KM2);
        if !pixel_area_km2.is_finite() || pixel_area_km2 <= 0.0 {
            return Err(D::Error::custom(ConfigError::PixelArea(pixel_area_km2)));
        }

        let extensions = match helper.extensions {
            Some(extensions) => normalize_extensions(extensions).map_err(D::Error::custom)?,
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        };

        let classes = match helper.classes {
            Some(classes) => vocabulary_from_map(classes).map_err(D::Error::custom)?,
            None => ClassVocabulary::wetlands(),
        };

        let expected_crs = helper
            .expected_crs
            .unwrap_or_else(|| CrsId::epsg(EXPECTED_EPSG));

        Ok(Config {
            basins: helper.basins,
            boundary_dir: helper.boundary_dir,
            raster_dir: helper.raster_dir,
            output_dir: helper.output_dir,
            output_format: helper.output_format,
            expected_crs,
            pixel_area_km2,
            extensions,
            classes,
        })
    }
}

fn validate_basins(basins: &[String]) -> Result<(), ConfigError> {
    if basins.is_empty() {
        return Err(ConfigError::NoBasins);
    }

    let mut seen = HashSet::new();
    for basin in basins {
        let plain = !basin.is_empty()
            && basin != "."
            && basin != ".."
            && !basin.contains(['/', '\\']);
        if !plain {
            return Err(ConfigError::InvalidBasinName(basin.clone()));
        }
        if !seen.insert(basin.as_str()) {
            return Err(ConfigError::DuplicateBasin(basin.clone()));
        }
    }

    Ok(())
}

fn normalize_extensions(extensions: Vec<String>) -> Result<Vec<String>, ConfigError> {
    let extensions: Vec<String> = extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    if extensions.is_empty() {
        return Err(ConfigError::NoExtensions);
    }

    Ok(extensions)
}

fn vocabulary_from_map(classes: BTreeMap<ClassCode, String>) -> Result<ClassVocabulary, ConfigError> {
    if classes.is_empty() {
        return Err(ConfigError::NoClasses);
    }

    for (code, label) in &classes {
        if *code <= 0 {
            return Err(ConfigError::ClassCode(*code));
        }
        if label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel(*code));
        }
    }

    Ok(ClassVocabulary::new(classes))
}

impl Config {
    pub fn new<P: AsRef<Path>>(
        basins: Vec<String>,
        boundary_dir: P,
        raster_dir: P,
        output_dir: P,
    ) -> Self {
        Self {
            basins,
            boundary_dir: boundary_dir.as_ref().to_path_buf(),
            raster_dir: raster_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            output_format: OutputFormat::default(),
            expected_crs: CrsId::epsg(EXPECTED_EPSG),
            pixel_area_km2: PIXEL_AREA_KM2,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            classes: ClassVocabulary::wetlands(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Restricts the run to `names`, keeping the configured order.
    pub fn select_basins(&mut self, names: &[String]) -> Result<(), ConfigError> {
        if let Some(unknown) = names.iter().find(|name| !self.basins.contains(*name)) {
            return Err(ConfigError::UnknownBasin(unknown.clone()));
        }

        self.basins.retain(|basin| names.contains(basin));
        Ok(())
    }

    pub fn basins(&self) -> &[String] {
        &self.basins
    }

    pub fn boundary_dir(&self) -> &Path {
        &self.boundary_dir
    }

    pub fn raster_dir(&self) -> &Path {
        &self.raster_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn expected_crs(&self) -> &CrsId {
        &self.expected_crs
    }

    pub fn pixel_area_km2(&self) -> f64 {
        self.pixel_area_km2
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn classes(&self) -> &ClassVocabulary {
        &self.classes
    }
}
