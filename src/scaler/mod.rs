//! Per-dimension min-max feature scaling
//!
//! Fit on training data, then applied identically to training and prediction
//! inputs so both live in the same [0, 1] box.

use serde::{Deserialize, Serialize};

use crate::core::Dataset;

/// Value assigned to a dimension whose training range is a single point
const CONSTANT_DIMENSION_VALUE: f64 = 0.5;

/// Per-dimension (min, max) ranges learned from a training dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    ranges: Vec<(f64, f64)>,
}

impl ScalerParams {
    /// Compute per-dimension min/max in a single pass over the dataset
    ///
    /// Idempotent for a given dataset; the dataset is never mutated.
    pub fn fit(dataset: &Dataset) -> Self {
        let mut ranges = vec![(f64::INFINITY, f64::NEG_INFINITY); dataset.dim()];
        for sample in dataset.samples() {
            for (range, &value) in ranges.iter_mut().zip(&sample.features) {
                range.0 = range.0.min(value);
                range.1 = range.1.max(value);
            }
        }
        Self { ranges }
    }

    /// Rebuild scaler params from persisted ranges
    pub fn from_ranges(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    /// The learned (min, max) per dimension
    pub fn ranges(&self) -> &[(f64, f64)] {
        &self.ranges
    }

    /// Dimensionality the scaler was fit on
    pub fn dim(&self) -> usize {
        self.ranges.len()
    }

    /// Map each feature to (x - min) / (max - min), clamped to [0, 1]
    ///
    /// Clamping keeps out-of-range prediction inputs from extrapolating the
    /// decision function. A dimension with min == max maps to 0.5.
    pub fn transform(&self, vector: &[f64]) -> Vec<f64> {
        vector
            .iter()
            .zip(&self.ranges)
            .map(|(&x, &(min, max))| {
                if min == max {
                    CONSTANT_DIMENSION_VALUE
                } else {
                    ((x - min) / (max - min)).clamp(0.0, 1.0)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sample;

    fn dataset() -> Dataset {
        Dataset::from_samples(vec![
            Sample::new(vec![0.0, 10.0, 7.0], 1),
            Sample::new(vec![5.0, 20.0, 7.0], 2),
            Sample::new(vec![2.5, 15.0, 7.0], 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_computes_per_dimension_ranges() {
        let params = ScalerParams::fit(&dataset());
        assert_eq!(params.ranges(), &[(0.0, 5.0), (10.0, 20.0), (7.0, 7.0)]);
        assert_eq!(params.dim(), 3);
    }

    #[test]
    fn test_transform_maps_to_unit_interval() {
        let params = ScalerParams::fit(&dataset());
        assert_eq!(params.transform(&[0.0, 10.0, 7.0]), vec![0.0, 0.0, 0.5]);
        assert_eq!(params.transform(&[5.0, 20.0, 7.0]), vec![1.0, 1.0, 0.5]);
        assert_eq!(params.transform(&[2.5, 15.0, 7.0]), vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_transform_clamps_out_of_range_inputs() {
        let params = ScalerParams::fit(&dataset());
        let scaled = params.transform(&[-10.0, 100.0, 7.0]);
        assert_eq!(scaled, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_constant_dimension_avoids_division_by_zero() {
        let params = ScalerParams::fit(&dataset());
        let scaled = params.transform(&[1.0, 12.0, 123.0]);
        assert_eq!(scaled[2], 0.5);
        assert!(scaled.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_fit_is_idempotent() {
        let d = dataset();
        assert_eq!(ScalerParams::fit(&d), ScalerParams::fit(&d));
    }
}
