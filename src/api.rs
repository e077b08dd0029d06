//! High-level builder API
//!
//! # Quick start
//!
//! ```rust,no_run
//! use maxmargin::{Dataset, KernelSpec, Sample, Svm};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = Dataset::from_samples(vec![
//!     Sample::new(vec![0.0, 0.0], 1),
//!     Sample::new(vec![0.0, 1.0], 1),
//!     Sample::new(vec![5.0, 5.0], 2),
//!     Sample::new(vec![5.0, 6.0], 2),
//! ])?;
//!
//! let model = Svm::new()
//!     .with_kernel(KernelSpec::Linear)
//!     .with_c(1.0)
//!     .with_scaling(true)
//!     .train(&dataset)?;
//!
//! let result = model.predict(&[0.0, 0.5])?;
//! println!("predicted class {}", result.label);
//! # Ok(())
//! # }
//! ```

use crate::core::{Dataset, OptimizerConfig, Result};
use crate::kernel::KernelSpec;
use crate::model::ClassifierModel;

/// Builder for multi-class SVM training
pub struct Svm {
    kernel: KernelSpec,
    config: OptimizerConfig,
    scaling: bool,
}

impl Svm {
    /// Linear kernel, default configuration, scaling disabled
    pub fn new() -> Self {
        Self {
            kernel: KernelSpec::Linear,
            config: OptimizerConfig::default(),
            scaling: false,
        }
    }

    /// Set the kernel family and parameters
    pub fn with_kernel(mut self, kernel: KernelSpec) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the box constraint C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set the KKT violation tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set the iteration bound per binary sub-problem
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the kernel cache budget in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    /// Enable or disable min-max feature scaling
    pub fn with_scaling(mut self, scaling: bool) -> Self {
        self.scaling = scaling;
        self
    }

    /// Train a model on the dataset
    pub fn train(self, dataset: &Dataset) -> Result<ClassifierModel> {
        ClassifierModel::train(dataset, self.kernel, &self.config, self.scaling)
    }
}

impl Default for Svm {
    fn default() -> Self {
        Self::new()
    }
}
