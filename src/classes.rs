use std::collections::BTreeMap;
use std::fmt::Display;

/// Pixel area in square kilometers (30 m x 30 m pixel = 900 m² = 0.0009 km²)
pub const PIXEL_AREA_KM2: f64 = 0.0009;

/// NAD83 / Statistics Canada Lambert
pub const EXPECTED_EPSG: u32 = 3348;

pub type ClassCode = i64;

/// Ordered mapping from raster pixel codes to wetland class labels.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVocabulary {
    classes: BTreeMap<ClassCode, String>,
}

impl ClassVocabulary {
    pub fn new(classes: BTreeMap<ClassCode, String>) -> Self {
        Self { classes }
    }

    pub fn wetlands() -> Self {
        let classes = [(1, "bog"), (2, "fen"), (3, "swamp"), (4, "marsh"), (5, "water")]
            .into_iter()
            .map(|(code, label)| (code, label.to_string()))
            .collect();

        Self { classes }
    }

    pub fn label(&self, code: ClassCode) -> Option<&str> {
        self.classes.get(&code).map(String::as_str)
    }

    pub fn contains(&self, code: ClassCode) -> bool {
        self.classes.contains_key(&code)
    }

    pub fn codes(&self) -> impl Iterator<Item = ClassCode> + '_ {
        self.classes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassCode, &str)> {
        self.classes.iter().map(|(code, label)| (*code, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for ClassVocabulary {
    fn default() -> Self {
        Self::wetlands()
    }
}

impl Display for ClassVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: Vec<String> = self
            .iter()
            .map(|(code, label)| format!("{code}={label}"))
            .collect();
        write!(f, "{}", entries.join(", "))
    }
}
