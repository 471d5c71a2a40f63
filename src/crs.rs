use gdal::errors::GdalError;
use gdal::spatial_ref::{AxisMappingStrategy, SpatialRef};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

/// Coordinate reference identifier in `AUTHORITY:CODE` form, e.g. `EPSG:3348`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct CrsId(String);

#[derive(Debug, thiserror::Error)]
#[error("invalid CRS identifier \"{0}\": expected AUTHORITY:CODE")]
pub struct CrsParseError(String);

impl CrsId {
    pub fn new(authority: &str, code: &str) -> Self {
        Self(format!("{}:{}", authority.to_uppercase(), code))
    }

    pub fn epsg(code: u32) -> Self {
        Self::new("EPSG", &code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CrsId {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            Some((authority, code))
                if !authority.is_empty()
                    && !code.is_empty()
                    && authority.chars().all(|c| c.is_ascii_alphanumeric())
                    && !code.contains(':') =>
            {
                Ok(Self::new(authority, code))
            }
            _ => Err(CrsParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for CrsId {
    type Error = CrsParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for CrsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A coordinate reference system: its definition, plus the identifier used
/// to report it when one is known.
///
/// Systems are compared by what they describe. A WKT definition without an
/// authority node is the same system as the EPSG code it spells out.
#[derive(Debug, Clone)]
pub struct Crs {
    definition: String,
    id: Option<CrsId>,
}

impl Crs {
    /// `definition` is anything GDAL accepts as user input (WKT, PROJ
    /// string, `AUTHORITY:CODE`).
    pub fn new(definition: impl Into<String>, id: Option<CrsId>) -> Self {
        Self {
            definition: definition.into(),
            id,
        }
    }

    pub fn epsg(code: u32) -> Self {
        Self::from(CrsId::epsg(code))
    }

    /// Captures the WKT of `srs` and its authority code. Shapefile `.prj`
    /// files and ERDAS headers often carry WKT without an authority node, so
    /// the EPSG code is identified from the definition when it is missing.
    pub fn from_spatial_ref(mut srs: SpatialRef) -> Result<Self, GdalError> {
        let definition = srs.to_wkt()?;

        if srs.auth_code().is_err() {
            let _ = srs.auto_identify_epsg();
        }
        let id = match (srs.auth_name(), srs.auth_code()) {
            (Some(authority), Ok(code)) => Some(CrsId::new(&authority, &code.to_string())),
            _ => None,
        };

        Ok(Self { definition, id })
    }

    pub fn id(&self) -> Option<&CrsId> {
        self.id.as_ref()
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Builds the GDAL spatial reference, in x/y (easting, northing) order.
    pub fn spatial_ref(&self) -> Result<SpatialRef, GdalError> {
        let mut srs = SpatialRef::from_definition(&self.definition)?;
        srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        Ok(srs)
    }

    /// Whether both describe the same system (OSRIsSame). A definition GDAL
    /// cannot parse only matches an identical definition.
    pub fn is_same(&self, other: &Crs) -> bool {
        if self.definition == other.definition {
            return true;
        }
        if matches!((&self.id, &other.id), (Some(a), Some(b)) if a == b) {
            return true;
        }

        match (self.spatial_ref(), other.spatial_ref()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl From<CrsId> for Crs {
    fn from(id: CrsId) -> Self {
        Self {
            definition: id.to_string(),
            id: Some(id),
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "unidentified CRS"),
        }
    }
}

/// Compares two optional systems; two missing systems are the same.
pub fn same_crs(a: Option<&Crs>, b: Option<&Crs>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_same(b),
        (None, None) => true,
        _ => false,
    }
}

/// Formats an optional CRS the way log messages report it.
pub fn describe(crs: Option<&Crs>) -> String {
    crs.map_or_else(|| "None".to_string(), Crs::to_string)
}

/// Removes every `AUTHORITY[...]` node from a WKT1 string.
#[cfg(test)]
pub(crate) fn without_authority(wkt: &str) -> String {
    let mut stripped = wkt.to_string();
    while let Some(start) = stripped.find(",AUTHORITY[") {
        let end = stripped[start..].find(']').unwrap() + start + 1;
        stripped.replace_range(start..end, "");
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs_id() {
        let crs: CrsId = "epsg:3348".parse().unwrap();
        assert_eq!(crs, CrsId::epsg(3348));
        assert_eq!(crs.as_str(), "EPSG:3348");

        assert!("3348".parse::<CrsId>().is_err());
        assert!("EPSG:".parse::<CrsId>().is_err());
        assert!(":3348".parse::<CrsId>().is_err());
        assert!("EPSG:33:48".parse::<CrsId>().is_err());
    }

    #[test]
    fn test_describe_missing_crs() {
        assert_eq!(describe(None), "None");
        assert_eq!(describe(Some(&Crs::epsg(4326))), "EPSG:4326");
        assert_eq!(describe(Some(&Crs::new("LOCAL_CS[\"grid\"]", None))), "unidentified CRS");
    }

    #[test]
    fn test_wkt_without_authority_matches_epsg_code() {
        let wkt = SpatialRef::from_epsg(3348).unwrap().to_wkt().unwrap();
        let untagged = Crs::new(without_authority(&wkt), None);
        assert!(!untagged.definition().contains("AUTHORITY"));

        assert!(untagged.is_same(&Crs::epsg(3348)));
        assert!(Crs::epsg(3348).is_same(&untagged));
        assert!(!untagged.is_same(&Crs::epsg(32617)));
    }

    #[test]
    fn test_different_codes_are_different_systems() {
        assert!(Crs::epsg(3348).is_same(&Crs::epsg(3348)));
        assert!(!Crs::epsg(3348).is_same(&Crs::epsg(32617)));
    }

    #[test]
    fn test_from_spatial_ref_keeps_identifier() {
        let crs = Crs::from_spatial_ref(SpatialRef::from_epsg(3348).unwrap()).unwrap();

        assert_eq!(crs.id(), Some(&CrsId::epsg(3348)));
        assert!(crs.is_same(&Crs::epsg(3348)));
    }

    #[test]
    fn test_same_crs_with_missing_systems() {
        assert!(same_crs(None, None));
        assert!(!same_crs(Some(&Crs::epsg(3348)), None));
        assert!(!same_crs(None, Some(&Crs::epsg(3348))));
    }
}
