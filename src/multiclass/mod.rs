//! One-vs-one multi-class composition
//!
//! A K-class problem decomposes into K*(K-1)/2 independent binary
//! sub-problems, one per unordered label pair. Sub-problems share no mutable
//! state and train in parallel; a single failing pair aborts the whole
//! training so a partial model is never returned.

use log::debug;
use rayon::prelude::*;

use crate::core::{OptimizerConfig, Result, SvmError};
use crate::kernel::KernelSpec;
use crate::model::{BinaryModel, SupportVector};
use crate::solver::SmoSolver;

/// Enumerate unordered label pairs (a, b) with a < b in lexicographic order
///
/// The input must be sorted and deduplicated; the output order is what makes
/// training and the model layout deterministic.
pub fn label_pairs(labels: &[u32]) -> Vec<(u32, u32)> {
    let mut pairs = Vec::with_capacity(labels.len() * (labels.len().saturating_sub(1)) / 2);
    for (i, &a) in labels.iter().enumerate() {
        for &b in &labels[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}

/// Train one binary model per label pair, in parallel
///
/// `features` are the (already scaled) training vectors and `labels` their
/// class labels, index-aligned. The smaller label of each pair maps to +1.
pub fn train_pairwise(
    features: &[Vec<f64>],
    labels: &[u32],
    class_labels: &[u32],
    kernel: &KernelSpec,
    config: &OptimizerConfig,
) -> Result<Vec<BinaryModel>> {
    let pairs = label_pairs(class_labels);

    pairs
        .par_iter()
        .map(|&(a, b)| {
            train_pair(features, labels, (a, b), kernel, config).map_err(|source| {
                SvmError::PairwiseTraining {
                    labels: (a, b),
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

/// Train the binary model discriminating labels `a` and `b`
fn train_pair(
    features: &[Vec<f64>],
    labels: &[u32],
    (a, b): (u32, u32),
    kernel: &KernelSpec,
    config: &OptimizerConfig,
) -> Result<BinaryModel> {
    let mut subset: Vec<&[f64]> = Vec::new();
    let mut y: Vec<f64> = Vec::new();
    for (vector, &label) in features.iter().zip(labels) {
        if label == a {
            subset.push(vector.as_slice());
            y.push(1.0);
        } else if label == b {
            subset.push(vector.as_slice());
            y.push(-1.0);
        }
    }

    if !y.contains(&1.0) || !y.contains(&-1.0) {
        return Err(SvmError::InsufficientData(format!(
            "no samples for one side of pair ({a}, {b})"
        )));
    }

    let solution = SmoSolver::new(kernel, config).solve(&subset, &y)?;

    let support_vectors: Vec<SupportVector> = solution
        .support
        .iter()
        .map(|&i| SupportVector {
            features: subset[i].to_vec(),
            coefficient: solution.alpha[i] * y[i],
        })
        .collect();

    debug!(
        "pair ({a}, {b}): {} support vectors of {} samples, bias {:.6}",
        support_vectors.len(),
        y.len(),
        solution.bias
    );

    Ok(BinaryModel {
        labels: (a, b),
        bias: solution.bias,
        support_vectors,
        diagnostics: Some(solution.diagnostics),
    })
}
