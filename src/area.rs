use serde::Serialize;

use crate::accumulator::ClassCountTable;
use crate::classes::ClassVocabulary;

/// Column headers of the area summary, in order.
pub const AREA_COLUMNS: [&str; 4] = ["Model", "Class", "Pixel_Count", "Area_km2"];

/// One line of the area summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRow {
    #[serde(rename = "Model")]
    pub band: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Pixel_Count")]
    pub pixel_count: u64,
    #[serde(rename = "Area_km2")]
    pub area_km2: f64,
}

/// Converts the accumulated counts to areas, ordered by band then class code.
pub fn to_area_rows(
    table: &ClassCountTable,
    vocabulary: &ClassVocabulary,
    pixel_area_km2: f64,
) -> Vec<AreaRow> {
    table
        .iter()
        .flat_map(|(band, classes)| {
            classes.iter().filter_map(move |(code, count)| {
                let label = vocabulary.label(*code)?;
                Some(AreaRow {
                    band: band.to_string(),
                    class: label.to_string(),
                    pixel_count: *count,
                    area_km2: *count as f64 * pixel_area_km2,
                })
            })
        })
        .collect()
}
