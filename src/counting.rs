use std::collections::BTreeMap;

use crate::classes::ClassCode;

/// Observed pixel value -> number of pixels.
pub type ClassCounts = BTreeMap<ClassCode, u64>;

/// Running pixel counts of one band, fed strip by strip.
///
/// Pixels equal to `nodata` are excluded; with no nodata every pixel counts.
/// Values that are not whole numbers cannot be class codes and are skipped.
#[derive(Debug, Clone, Default)]
pub struct ClassCounter {
    nodata: Option<f64>,
    counts: ClassCounts,
}

impl ClassCounter {
    pub fn new(nodata: Option<f64>) -> Self {
        Self {
            nodata,
            counts: ClassCounts::new(),
        }
    }

    pub fn add(&mut self, value: f64) {
        if self.nodata.is_some_and(|nd| is_nodata(value, nd)) {
            return;
        }
        if let Some(code) = as_class_code(value) {
            *self.counts.entry(code).or_insert(0) += 1;
        }
    }

    pub fn extend(&mut self, values: &[f64]) {
        for &value in values {
            self.add(value);
        }
    }

    pub fn finish(self) -> ClassCounts {
        self.counts
    }
}

fn is_nodata(value: f64, nodata: f64) -> bool {
    if nodata.is_nan() {
        value.is_nan()
    } else {
        value == nodata
    }
}

fn as_class_code(value: f64) -> Option<ClassCode> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as ClassCode)
    } else {
        None
    }
}
