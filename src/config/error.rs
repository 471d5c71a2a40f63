use crate::classes::ClassCode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one basin must be configured")]
    NoBasins,

    #[error("basin \"{0}\" is listed more than once")]
    DuplicateBasin(String),

    #[error("basin \"{0}\" is not configured")]
    UnknownBasin(String),

    #[error("basin name \"{0}\" must be a plain directory name")]
    InvalidBasinName(String),

    #[error("pixel_area_km2 must be a positive number, got {0}")]
    PixelArea(f64),

    #[error("at least one raster extension must be configured")]
    NoExtensions,

    #[error("the class vocabulary is empty")]
    NoClasses,

    #[error("class code {0} must be a positive integer")]
    ClassCode(ClassCode),

    #[error("class {0} has an empty label")]
    EmptyLabel(ClassCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
