//! Core type definitions for the classification engine

use std::collections::BTreeMap;

use crate::core::{Result, SvmError};

/// Training sample: a dense feature vector paired with a class label
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Feature values, fixed dimensionality per dataset
    pub features: Vec<f64>,
    /// Class label
    pub label: u32,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: u32) -> Self {
        Self { features, label }
    }

    /// Dimensionality of the feature vector
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// An in-memory labelled dataset with uniform dimensionality
///
/// Construction validates the invariants the engine relies on: at least one
/// sample, every sample carrying exactly `dim` features. The distinct labels
/// are collected once, sorted, so that downstream pair enumeration and
/// per-class outputs are deterministic.
#[derive(Clone, Debug)]
pub struct Dataset {
    samples: Vec<Sample>,
    dim: usize,
    labels: Vec<u32>,
}

impl Dataset {
    /// Build a dataset from samples, validating uniform dimensionality
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let first = samples
            .first()
            .ok_or_else(|| SvmError::InsufficientData("dataset is empty".to_string()))?;
        let dim = first.dim();
        if dim == 0 {
            return Err(SvmError::InsufficientData(
                "samples have zero features".to_string(),
            ));
        }
        for sample in &samples {
            if sample.dim() != dim {
                return Err(SvmError::DimensionMismatch {
                    expected: dim,
                    actual: sample.dim(),
                });
            }
        }

        let mut labels: Vec<u32> = samples.iter().map(|s| s.label).collect();
        labels.sort_unstable();
        labels.dedup();

        Ok(Self {
            samples,
            dim,
            labels,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check whether the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Sorted distinct class labels
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// All samples in insertion order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

/// Configuration for the SMO dual optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Box constraint C (upper bound for each dual coefficient)
    pub c: f64,
    /// KKT violation tolerance for convergence
    pub epsilon: f64,
    /// Iteration bound; hitting it is a degraded result, not an error
    pub max_iterations: usize,
    /// Kernel cache budget in bytes, private to one binary sub-problem
    pub cache_size: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 10_000,
            cache_size: 100_000_000, // 100MB
        }
    }
}

/// Convergence diagnostics of one SMO run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoDiagnostics {
    /// Whether the KKT violation dropped below tolerance within the bound
    pub converged: bool,
    /// Outer iterations performed
    pub iterations: usize,
    /// Maximum KKT violation at termination
    pub kkt_violation: f64,
}

/// Outcome of one prediction call
///
/// Produced fresh per call; maps are keyed by class label so iteration order
/// is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predicted class label
    pub label: u32,
    /// Per-class likelihood in [0, 1], summing to 1
    pub likelihoods: BTreeMap<u32, f64>,
    /// Per-class summed signed decision distance
    pub distances: BTreeMap<u32, f64>,
}
