//! Prediction over a trained model
//!
//! Evaluates every pairwise decision function, aggregates one-vs-one votes,
//! and calibrates signed distances into a normalized per-class likelihood
//! vector. Calls are side-effect free: a model can serve any number of
//! concurrent predictions.

use std::collections::BTreeMap;

use crate::core::{PredictionResult, Result, SvmError};
use crate::model::ClassifierModel;

/// Gain of the logistic squashing applied to signed decision distances.
/// Unit-margin decisions map to a per-pair confidence of ~0.98.
const LIKELIHOOD_GAIN: f64 = 4.0;

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl ClassifierModel {
    /// Predict the class of a feature vector
    ///
    /// Validates dimensionality, applies the scaler when the model was
    /// trained with scaling, and aggregates all pairwise decisions. Votes
    /// decide the label; vote ties fall back to the larger summed signed
    /// distance, then to the smallest label value.
    pub fn predict(&self, input: &[f64]) -> Result<PredictionResult> {
        if input.len() != self.dim() {
            return Err(SvmError::DimensionMismatch {
                expected: self.dim(),
                actual: input.len(),
            });
        }

        let scaled: Vec<f64> = match self.scaler() {
            Some(params) => params.transform(input),
            None => input.to_vec(),
        };

        let mut votes: BTreeMap<u32, u32> = BTreeMap::new();
        let mut distances: BTreeMap<u32, f64> = BTreeMap::new();
        let mut likelihoods: BTreeMap<u32, f64> = BTreeMap::new();
        for &label in self.labels() {
            votes.insert(label, 0);
            distances.insert(label, 0.0);
            likelihoods.insert(label, 0.0);
        }

        for binary in self.binary_models() {
            let (a, b) = binary.labels;
            let decision = binary.decision(self.kernel(), &scaled)?;

            let winner = if decision >= 0.0 { a } else { b };
            *votes.entry(winner).or_insert(0) += 1;

            *distances.entry(a).or_insert(0.0) += decision;
            *distances.entry(b).or_insert(0.0) -= decision;

            let p = logistic(LIKELIHOOD_GAIN * decision);
            *likelihoods.entry(a).or_insert(0.0) += p;
            *likelihoods.entry(b).or_insert(0.0) += 1.0 - p;
        }

        let total: f64 = likelihoods.values().sum();
        if total > 0.0 {
            for value in likelihoods.values_mut() {
                *value /= total;
            }
        }

        // Most votes wins; ties broken by summed signed distance toward the
        // class, then by smallest label (maps iterate in ascending label
        // order, so strict comparisons keep the smallest on ties). The
        // signed sum is used because a pair's decision magnitude is shared
        // by both of its labels and cannot order tied classes.
        let mut best: Option<(u32, u32, f64)> = None;
        for (&label, &count) in &votes {
            let distance = distances[&label];
            let better = match best {
                None => true,
                Some((_, best_count, best_distance)) => {
                    count > best_count || (count == best_count && distance > best_distance)
                }
            };
            if better {
                best = Some((label, count, distance));
            }
        }
        let (label, _, _) = best.expect("model has at least two classes");

        Ok(PredictionResult {
            label,
            likelihoods,
            distances,
        })
    }
}
