//! Kernel function families
//!
//! The kernel set is closed and performance-critical, so dispatch is a tagged
//! enum with one evaluation arm per family rather than trait objects.

use crate::core::{Result, SvmError};

/// Kernel family with its parameters, immutable after construction
#[derive(Debug, Clone, PartialEq)]
pub enum KernelSpec {
    /// K(x, y) = x . y
    Linear,
    /// K(x, y) = (gamma * x . y + coef0) ^ degree
    Polynomial { degree: u32, gamma: f64, coef0: f64 },
    /// K(x, y) = exp(-gamma * ||x - y||^2)
    Rbf { gamma: f64 },
    /// K(x, y) = tanh(gamma * x . y + coef0)
    Sigmoid { gamma: f64, coef0: f64 },
    /// Feature vectors are precomputed kernel rows; element 0 of each vector
    /// holds the sample's own 1-based column id, so K(a, b) = a[b[0]]
    Precomputed,
}

impl KernelSpec {
    /// Stable family tag used by the model file format
    pub fn family(&self) -> &'static str {
        match self {
            KernelSpec::Linear => "linear",
            KernelSpec::Polynomial { .. } => "polynomial",
            KernelSpec::Rbf { .. } => "rbf",
            KernelSpec::Sigmoid { .. } => "sigmoid",
            KernelSpec::Precomputed => "precomputed",
        }
    }

    /// Validate kernel parameters
    pub fn validate(&self) -> Result<()> {
        let gamma = match *self {
            KernelSpec::Polynomial { gamma, .. } => gamma,
            KernelSpec::Rbf { gamma } => gamma,
            KernelSpec::Sigmoid { gamma, .. } => gamma,
            KernelSpec::Linear | KernelSpec::Precomputed => return Ok(()),
        };
        if gamma <= 0.0 {
            return Err(SvmError::InvalidKernelParameter(format!(
                "gamma must be positive for the {} kernel, got {gamma}",
                self.family()
            )));
        }
        Ok(())
    }

    /// Compute K(a, b)
    ///
    /// Pure and symmetric. Fails on parameter or dimensionality problems;
    /// the solver validates once up front and then uses [`Self::raw`].
    pub fn evaluate(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        self.validate()?;
        if a.len() != b.len() {
            return Err(SvmError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        if let KernelSpec::Precomputed = self {
            let column = b.first().copied().unwrap_or(0.0);
            if column < 1.0 || column as usize >= a.len() {
                return Err(SvmError::InvalidKernelParameter(format!(
                    "precomputed column id {column} out of range for row of length {}",
                    a.len()
                )));
            }
        }
        Ok(self.raw(a, b))
    }

    /// Unchecked kernel evaluation for validated inputs
    pub(crate) fn raw(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            KernelSpec::Linear => dot(a, b),
            KernelSpec::Polynomial {
                degree,
                gamma,
                coef0,
            } => (gamma * dot(a, b) + coef0).powi(degree as i32),
            KernelSpec::Rbf { gamma } => (-gamma * squared_distance(a, b)).exp(),
            KernelSpec::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
            KernelSpec::Precomputed => {
                let column = b.first().copied().unwrap_or(0.0) as usize;
                a.get(column).copied().unwrap_or(0.0)
            }
        }
    }
}

/// Dot product of two dense vectors of equal length
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Squared Euclidean distance between two dense vectors of equal length
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_kernel() {
        let k = KernelSpec::Linear;
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];
        assert_eq!(k.evaluate(&a, &b).unwrap(), 32.0);
        assert_eq!(k.evaluate(&a, &a).unwrap(), 14.0);
    }

    #[test]
    fn test_polynomial_kernel() {
        let k = KernelSpec::Polynomial {
            degree: 2,
            gamma: 0.5,
            coef0: 1.0,
        };
        let a = vec![1.0, 1.0];
        let b = vec![2.0, 2.0];
        // (0.5 * 4 + 1)^2 = 9
        assert_relative_eq!(k.evaluate(&a, &b).unwrap(), 9.0);
    }

    #[test]
    fn test_rbf_kernel() {
        let k = KernelSpec::Rbf { gamma: 1.0 };
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_relative_eq!(k.evaluate(&a, &a).unwrap(), 1.0);
        assert_relative_eq!(k.evaluate(&a, &b).unwrap(), (-2.0_f64).exp());
    }

    #[test]
    fn test_sigmoid_kernel() {
        let k = KernelSpec::Sigmoid {
            gamma: 0.5,
            coef0: -1.0,
        };
        let a = vec![1.0, 1.0];
        let b = vec![1.0, 1.0];
        assert_relative_eq!(k.evaluate(&a, &b).unwrap(), 0.0_f64.tanh());
    }

    #[test]
    fn test_precomputed_kernel_row_lookup() {
        let k = KernelSpec::Precomputed;
        // Row of sample 1: serial 1, then K(1,1), K(1,2)
        let row_a = vec![1.0, 5.0, 2.5];
        let row_b = vec![2.0, 2.5, 4.0];
        assert_eq!(k.evaluate(&row_a, &row_b).unwrap(), 2.5);
        assert_eq!(k.evaluate(&row_b, &row_a).unwrap(), 2.5);
    }

    #[test]
    fn test_precomputed_kernel_bad_column() {
        let k = KernelSpec::Precomputed;
        let row_a = vec![1.0, 5.0];
        let row_b = vec![9.0, 2.5];
        assert!(matches!(
            k.evaluate(&row_a, &row_b),
            Err(SvmError::InvalidKernelParameter(_))
        ));
    }

    #[test]
    fn test_symmetry() {
        let kernels = [
            KernelSpec::Linear,
            KernelSpec::Polynomial {
                degree: 3,
                gamma: 0.7,
                coef0: 0.1,
            },
            KernelSpec::Rbf { gamma: 0.3 },
            KernelSpec::Sigmoid {
                gamma: 0.2,
                coef0: 0.5,
            },
        ];
        let a = vec![0.5, -1.5, 2.0];
        let b = vec![1.0, 0.25, -0.75];
        for k in kernels {
            assert_eq!(k.evaluate(&a, &b).unwrap(), k.evaluate(&b, &a).unwrap());
        }
    }

    #[test]
    fn test_invalid_gamma_rejected() {
        for k in [
            KernelSpec::Rbf { gamma: 0.0 },
            KernelSpec::Rbf { gamma: -1.0 },
            KernelSpec::Polynomial {
                degree: 2,
                gamma: -0.5,
                coef0: 0.0,
            },
            KernelSpec::Sigmoid {
                gamma: 0.0,
                coef0: 0.0,
            },
        ] {
            assert!(matches!(
                k.evaluate(&[1.0], &[1.0]),
                Err(SvmError::InvalidKernelParameter(_))
            ));
            assert!(k.validate().is_err());
        }
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let k = KernelSpec::Linear;
        assert!(matches!(
            k.evaluate(&[1.0, 2.0], &[1.0]),
            Err(SvmError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_rbf_numerical_stability() {
        let k = KernelSpec::Rbf { gamma: 1e-6 };
        let a = vec![1e6];
        let b = vec![-1e6];
        let value = k.evaluate(&a, &b).unwrap();
        assert!(value.is_finite());
        assert!((0.0..=1.0).contains(&value));
    }
}
