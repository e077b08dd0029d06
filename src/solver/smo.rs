//! Sequential Minimal Optimization (SMO) solver
//!
//! Solves the soft-margin SVM dual for one binary-labelled sub-problem:
//! maximize sum(alpha) - 1/2 * sum_ij alpha_i alpha_j y_i y_j K(x_i, x_j)
//! subject to 0 <= alpha_i <= C and sum(alpha_i * y_i) = 0.
//!
//! Working pairs are chosen by the maximal-violating-pair heuristic: the
//! first index maximizes the gradient violation, the second maximizes the
//! objective decrease of the analytic two-variable step.

use log::{debug, warn};

use crate::cache::KernelCache;
use crate::core::{OptimizerConfig, Result, SmoDiagnostics, SvmError};
use crate::kernel::KernelSpec;

/// Coefficients below this are treated as zero when collecting support
/// vectors and classifying bound status.
const ALPHA_TOL: f64 = 1e-12;

/// Floor for the curvature term when the two-variable quadratic is not
/// positive definite.
const ETA_FLOOR: f64 = 1e-12;

/// Result of one SMO run
#[derive(Debug, Clone)]
pub struct SmoSolution {
    /// Dual coefficients, one per input sample
    pub alpha: Vec<f64>,
    /// Bias term of the decision function
    pub bias: f64,
    /// Indices of samples with nonzero dual coefficient
    pub support: Vec<usize>,
    /// Convergence diagnostics
    pub diagnostics: SmoDiagnostics,
}

/// SMO solver for one binary sub-problem
pub struct SmoSolver<'a> {
    kernel: &'a KernelSpec,
    config: &'a OptimizerConfig,
}

impl<'a> SmoSolver<'a> {
    /// Create a solver over the given kernel and configuration
    pub fn new(kernel: &'a KernelSpec, config: &'a OptimizerConfig) -> Self {
        Self { kernel, config }
    }

    /// Solve the dual problem for samples with labels mapped to +1/-1
    ///
    /// Hitting the iteration bound is not an error: the best solution found
    /// so far is returned, flagged in the diagnostics.
    pub fn solve(&self, features: &[&[f64]], y: &[f64]) -> Result<SmoSolution> {
        if features.is_empty() {
            return Err(SvmError::InsufficientData(
                "binary sub-problem has no samples".to_string(),
            ));
        }
        debug_assert_eq!(features.len(), y.len());
        debug_assert!(y.iter().all(|&v| v == 1.0 || v == -1.0));
        self.kernel.validate()?;

        let n = features.len();
        let c = self.config.c;
        let eps = self.config.epsilon;

        let mut cache = KernelCache::with_memory_limit(self.config.cache_size);
        let diag: Vec<f64> = features.iter().map(|x| self.kernel.raw(x, x)).collect();

        let mut alpha = vec![0.0; n];
        // Gradient of the dual objective: g_i = (Q * alpha)_i - 1
        let mut g = vec![-1.0; n];

        let in_up = |alpha: &[f64], t: usize| {
            (y[t] > 0.0 && alpha[t] < c - ALPHA_TOL) || (y[t] < 0.0 && alpha[t] > ALPHA_TOL)
        };
        let in_low = |alpha: &[f64], t: usize| {
            (y[t] > 0.0 && alpha[t] > ALPHA_TOL) || (y[t] < 0.0 && alpha[t] < c - ALPHA_TOL)
        };

        let mut iterations = 0;
        let mut violation = f64::INFINITY;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            // First index: maximal gradient violation over the upper set
            let mut i_best = None;
            let mut g_max = f64::NEG_INFINITY;
            for t in 0..n {
                if in_up(&alpha, t) {
                    let v = -y[t] * g[t];
                    if v > g_max {
                        g_max = v;
                        i_best = Some(t);
                    }
                }
            }
            let mut g_min = f64::INFINITY;
            for t in 0..n {
                if in_low(&alpha, t) {
                    g_min = g_min.min(-y[t] * g[t]);
                }
            }

            violation = g_max - g_min;
            if violation < eps {
                converged = true;
                break;
            }
            let i = match i_best {
                Some(i) => i,
                None => {
                    converged = true;
                    break;
                }
            };

            // Second index: maximal decrease of the two-variable objective
            let mut j_best: Option<(usize, f64)> = None;
            let mut best_gain = 0.0;
            for t in 0..n {
                if t == i || !in_low(&alpha, t) {
                    continue;
                }
                let b = g_max + y[t] * g[t];
                if b <= 0.0 {
                    continue;
                }
                let k_it = cache.get_or_compute(i, t, || self.kernel.raw(features[i], features[t]));
                let mut eta = diag[i] + diag[t] - 2.0 * k_it;
                if eta <= 0.0 {
                    if diag[i] == 0.0 && diag[t] == 0.0 {
                        return Err(SvmError::DegenerateKernel { index: i });
                    }
                    eta = ETA_FLOOR;
                }
                let gain = b * b / eta;
                if gain > best_gain {
                    best_gain = gain;
                    j_best = Some((t, eta));
                }
            }
            let (j, eta) = match j_best {
                Some(pair) => pair,
                None => break,
            };

            // Analytic two-variable solve with box clipping
            let alpha_i_old = alpha[i];
            let alpha_j_old = alpha[j];

            let (low, high) = if y[i] != y[j] {
                let diff = alpha_j_old - alpha_i_old;
                (diff.max(0.0), (c + diff).min(c))
            } else {
                let sum = alpha_i_old + alpha_j_old;
                ((sum - c).max(0.0), sum.min(c))
            };

            let mut alpha_j_new = alpha_j_old + y[j] * (y[i] * g[i] - y[j] * g[j]) / eta;
            alpha_j_new = alpha_j_new.clamp(low, high);

            if (alpha_j_new - alpha_j_old).abs() < ALPHA_TOL {
                // Clipping swallowed the step; nothing left to move
                break;
            }

            let alpha_i_new =
                (alpha_i_old + y[i] * y[j] * (alpha_j_old - alpha_j_new)).clamp(0.0, c);

            let delta_i = alpha_i_new - alpha_i_old;
            let delta_j = alpha_j_new - alpha_j_old;
            alpha[i] = alpha_i_new;
            alpha[j] = alpha_j_new;

            for t in 0..n {
                let k_it = cache.get_or_compute(i, t, || self.kernel.raw(features[i], features[t]));
                let k_jt = cache.get_or_compute(j, t, || self.kernel.raw(features[j], features[t]));
                g[t] += y[t] * (y[i] * delta_i * k_it + y[j] * delta_j * k_jt);
            }

            iterations += 1;
        }

        if !converged {
            warn!(
                "SMO stopped after {iterations} iterations with KKT violation {violation:.3e} \
                 (tolerance {eps:.3e}); keeping best solution found"
            );
        }
        debug!(
            "SMO finished: {iterations} iterations, kernel cache hit rate {:.2}",
            cache.hit_rate()
        );

        let bias = self.recover_bias(&alpha, &g, y);
        let support: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| (a > ALPHA_TOL).then_some(i))
            .collect();

        Ok(SmoSolution {
            alpha,
            bias,
            support,
            diagnostics: SmoDiagnostics {
                converged,
                iterations,
                kkt_violation: violation,
            },
        })
    }

    /// Recover the bias from the margin condition
    ///
    /// Averaged over unbounded support vectors (0 < alpha < C) for numerical
    /// stability; when none exist, the midpoint of the violation interval.
    fn recover_bias(&self, alpha: &[f64], g: &[f64], y: &[f64]) -> f64 {
        let c = self.config.c;
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_sum = 0.0;
        let mut free_count = 0usize;

        for i in 0..alpha.len() {
            let yg = y[i] * g[i];
            if alpha[i] >= c - ALPHA_TOL {
                if y[i] < 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else if alpha[i] <= ALPHA_TOL {
                if y[i] > 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else {
                free_sum += yg;
                free_count += 1;
            }
        }

        if free_count > 0 {
            -free_sum / free_count as f64
        } else {
            -(upper + lower) / 2.0
        }
    }
}
