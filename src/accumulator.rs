use std::collections::BTreeMap;

use crate::classes::{ClassCode, ClassVocabulary};
use crate::counting::ClassCounts;

/// Name under which a band's counts are merged across files: its description,
/// or `Band_<n>` (1-based) when it has none.
pub fn band_identity(description: Option<&str>, index: usize) -> String {
    match description {
        Some(description) if !description.is_empty() => description.to_string(),
        _ => format!("Band_{}", index + 1),
    }
}

/// Running pixel counts of one basin: band identity -> class code -> count.
///
/// Every band holds an entry for every vocabulary class, and counts only grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCountTable {
    bands: BTreeMap<String, BTreeMap<ClassCode, u64>>,
}

impl ClassCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one band's counts. Codes outside the vocabulary are dropped.
    pub fn fold(&mut self, band: &str, counts: &ClassCounts, vocabulary: &ClassVocabulary) {
        let entry = self
            .bands
            .entry(band.to_string())
            .or_insert_with(|| vocabulary.codes().map(|code| (code, 0)).collect());

        for (code, total) in entry.iter_mut() {
            *total += counts.get(code).copied().unwrap_or(0);
        }
    }

    /// Adds every count of `other`, e.g. a table built by another worker.
    pub fn merge(&mut self, other: &ClassCountTable) {
        for (band, classes) in &other.bands {
            let entry = self.bands.entry(band.clone()).or_default();
            for (code, count) in classes {
                *entry.entry(*code).or_insert(0) += count;
            }
        }
    }

    pub fn count(&self, band: &str, code: ClassCode) -> Option<u64> {
        self.bands.get(band)?.get(&code).copied()
    }

    pub fn bands(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<ClassCode, u64>)> {
        self.bands.iter().map(|(band, classes)| (band.as_str(), classes))
    }

    pub fn total_pixels(&self) -> u64 {
        self.bands.values().flat_map(|classes| classes.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(ClassCode, u64)]) -> ClassCounts {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_band_identity_fallback() {
        assert_eq!(band_identity(Some("ModelX"), 0), "ModelX");
        assert_eq!(band_identity(Some(""), 1), "Band_2");
        assert_eq!(band_identity(None, 0), "Band_1");
    }

    #[test]
    fn test_first_fold_initialises_every_class() {
        let vocabulary = ClassVocabulary::wetlands();
        let mut table = ClassCountTable::new();

        table.fold("Band_1", &ClassCounts::new(), &vocabulary);

        assert_eq!(table.bands().collect::<Vec<_>>(), vec!["Band_1"]);
        for code in vocabulary.codes() {
            assert_eq!(table.count("Band_1", code), Some(0));
        }
    }

    #[test]
    fn test_same_band_identity_is_summed() {
        let vocabulary = ClassVocabulary::wetlands();
        let mut table = ClassCountTable::new();

        table.fold("ModelX", &counts(&[(1, 10)]), &vocabulary);
        table.fold("ModelX", &counts(&[(1, 5), (3, 2)]), &vocabulary);

        assert_eq!(table.count("ModelX", 1), Some(15));
        assert_eq!(table.count("ModelX", 3), Some(2));
        assert_eq!(table.total_pixels(), 17);
    }

    #[test]
    fn test_codes_outside_vocabulary_are_dropped() {
        let vocabulary = ClassVocabulary::wetlands();
        let mut table = ClassCountTable::new();

        table.fold("Band_1", &counts(&[(0, 7), (2, 4), (9, 1)]), &vocabulary);

        assert_eq!(table.count("Band_1", 0), None);
        assert_eq!(table.count("Band_1", 9), None);
        assert_eq!(table.count("Band_1", 2), Some(4));
        assert_eq!(table.total_pixels(), 4);
    }

    #[test]
    fn test_fold_order_does_not_matter() {
        let vocabulary = ClassVocabulary::wetlands();
        let a = [("ModelX", counts(&[(1, 3), (2, 8)])), ("Band_2", counts(&[(5, 1)]))];
        let b = [("ModelX", counts(&[(2, 1), (4, 6)]))];

        let mut forward = ClassCountTable::new();
        for (band, c) in a.iter().chain(b.iter()) {
            forward.fold(band, c, &vocabulary);
        }
        let mut backward = ClassCountTable::new();
        for (band, c) in b.iter().chain(a.iter()) {
            backward.fold(band, c, &vocabulary);
        }

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_merge_matches_sequential_folds() {
        let vocabulary = ClassVocabulary::wetlands();
        let mut sequential = ClassCountTable::new();
        let mut left = ClassCountTable::new();
        let mut right = ClassCountTable::new();

        sequential.fold("ModelX", &counts(&[(1, 10)]), &vocabulary);
        sequential.fold("ModelX", &counts(&[(1, 5)]), &vocabulary);
        sequential.fold("ModelY", &counts(&[(4, 2)]), &vocabulary);
        left.fold("ModelX", &counts(&[(1, 10)]), &vocabulary);
        right.fold("ModelX", &counts(&[(1, 5)]), &vocabulary);
        right.fold("ModelY", &counts(&[(4, 2)]), &vocabulary);

        left.merge(&right);

        assert_eq!(left, sequential);
    }
}
