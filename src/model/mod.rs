//! Trained model state
//!
//! A [`ClassifierModel`] is built once by training, optionally serialized,
//! and then used read-only for prediction. Retraining or reloading replaces
//! the model wholesale; [`ModelHandle`] makes that replacement atomic under
//! concurrent prediction.

use std::sync::{Arc, RwLock};

use log::info;

use crate::core::{Dataset, OptimizerConfig, Result, SmoDiagnostics, SvmError};
use crate::kernel::KernelSpec;
use crate::multiclass;
use crate::scaler::ScalerParams;

/// A retained training sample with its signed dual coefficient
///
/// The coefficient is `alpha_i * y_i`, bounded by the box constraint C.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportVector {
    pub features: Vec<f64>,
    pub coefficient: f64,
}

/// One trained binary SVM between exactly two class labels
#[derive(Debug, Clone)]
pub struct BinaryModel {
    /// The two labels this model discriminates; positive decisions favor
    /// the first
    pub labels: (u32, u32),
    /// Bias term of the decision function
    pub bias: f64,
    /// Support vectors with signed coefficients
    pub support_vectors: Vec<SupportVector>,
    /// Convergence diagnostics; in-memory only, absent after deserialization
    pub diagnostics: Option<SmoDiagnostics>,
}

impl BinaryModel {
    /// Evaluate the decision function on an already-scaled input
    ///
    /// For the precomputed kernel the input is a row of kernel values
    /// against the training samples, and each support vector contributes
    /// the input value at the support vector's own column.
    pub fn decision(&self, kernel: &KernelSpec, input: &[f64]) -> Result<f64> {
        let mut value = self.bias;
        for sv in &self.support_vectors {
            let k = match kernel {
                KernelSpec::Precomputed => {
                    let column = sv.features.first().copied().unwrap_or(0.0);
                    if column < 1.0 || column as usize >= input.len() {
                        return Err(SvmError::InvalidKernelParameter(format!(
                            "precomputed column id {column} out of range for row of length {}",
                            input.len()
                        )));
                    }
                    input[column as usize]
                }
                _ => kernel.raw(&sv.features, input),
            };
            value += sv.coefficient * k;
        }
        Ok(value)
    }
}

/// The full trained artifact of multi-class training
#[derive(Debug, Clone)]
pub struct ClassifierModel {
    kernel: KernelSpec,
    scaler: Option<ScalerParams>,
    labels: Vec<u32>,
    c: f64,
    dim: usize,
    binaries: Vec<BinaryModel>,
}

impl ClassifierModel {
    /// Train a multi-class model on a labelled dataset
    ///
    /// Requires at least two distinct labels. Scaling, when enabled, is fit
    /// on the dataset and baked into the model so prediction inputs are
    /// transformed identically. Any failing pairwise sub-problem aborts the
    /// whole training; no partial model is returned.
    pub fn train(
        dataset: &Dataset,
        kernel: KernelSpec,
        config: &OptimizerConfig,
        scaling: bool,
    ) -> Result<Self> {
        kernel.validate()?;
        if let KernelSpec::Precomputed = kernel {
            if scaling {
                return Err(SvmError::InvalidKernelParameter(
                    "feature scaling cannot be combined with the precomputed kernel".to_string(),
                ));
            }
            for (i, sample) in dataset.samples().iter().enumerate() {
                let column = sample.features.first().copied().unwrap_or(0.0);
                if column < 1.0 || column as usize >= dataset.dim() {
                    return Err(SvmError::InvalidKernelParameter(format!(
                        "sample {i}: precomputed column id {column} out of range for row of length {}",
                        dataset.dim()
                    )));
                }
            }
        }
        let class_labels = dataset.labels().to_vec();
        if class_labels.len() < 2 {
            return Err(SvmError::InsufficientData(format!(
                "training requires at least 2 distinct labels, got {}",
                class_labels.len()
            )));
        }

        info!(
            "training one-vs-one SVM: {} samples, {} classes, {} pairs, kernel {}",
            dataset.len(),
            class_labels.len(),
            class_labels.len() * (class_labels.len() - 1) / 2,
            kernel.family()
        );

        let scaler = scaling.then(|| ScalerParams::fit(dataset));
        let features: Vec<Vec<f64>> = dataset
            .samples()
            .iter()
            .map(|s| match &scaler {
                Some(params) => params.transform(&s.features),
                None => s.features.clone(),
            })
            .collect();
        let labels: Vec<u32> = dataset.samples().iter().map(|s| s.label).collect();

        let binaries =
            multiclass::train_pairwise(&features, &labels, &class_labels, &kernel, config)?;

        let total_svs: usize = binaries.iter().map(|b| b.support_vectors.len()).sum();
        info!(
            "training complete: {} binary models, {total_svs} support vectors",
            binaries.len()
        );

        Ok(Self {
            kernel,
            scaler,
            labels: class_labels,
            c: config.c,
            dim: dataset.dim(),
            binaries,
        })
    }

    /// Reassemble a model from its persisted parts
    pub(crate) fn from_parts(
        kernel: KernelSpec,
        scaler: Option<ScalerParams>,
        labels: Vec<u32>,
        c: f64,
        dim: usize,
        binaries: Vec<BinaryModel>,
    ) -> Self {
        Self {
            kernel,
            scaler,
            labels,
            c,
            dim,
            binaries,
        }
    }

    /// Kernel this model was trained with
    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    /// Scaler parameters, present when training had scaling enabled
    pub fn scaler(&self) -> Option<&ScalerParams> {
        self.scaler.as_ref()
    }

    /// Sorted class labels seen at training time
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Box constraint used for training
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Expected input dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Pairwise binary models in deterministic pair order
    pub fn binary_models(&self) -> &[BinaryModel] {
        &self.binaries
    }

    /// Convergence diagnostics per pair, where available
    pub fn diagnostics(&self) -> Vec<((u32, u32), Option<SmoDiagnostics>)> {
        self.binaries
            .iter()
            .map(|b| (b.labels, b.diagnostics))
            .collect()
    }
}

/// Shared handle that swaps models atomically
///
/// In-flight predictions hold an `Arc` to the snapshot they started with, so
/// a reload never exposes a partially-replaced model.
pub struct ModelHandle {
    inner: RwLock<Arc<ClassifierModel>>,
}

impl ModelHandle {
    /// Publish an initial model
    pub fn new(model: ClassifierModel) -> Self {
        Self {
            inner: RwLock::new(Arc::new(model)),
        }
    }

    /// Current model snapshot
    pub fn load(&self) -> Arc<ClassifierModel> {
        Arc::clone(&self.inner.read().expect("model lock poisoned"))
    }

    /// Replace the model wholesale
    pub fn swap(&self, model: ClassifierModel) {
        *self.inner.write().expect("model lock poisoned") = Arc::new(model);
    }
}
