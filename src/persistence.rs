//! Model serialization and persistence
//!
//! The persisted format is textual JSON with a leading format-version field
//! and stable struct field ordering, so trained artifacts diff cleanly under
//! version control. Support vectors and coefficients are stored at full
//! precision: deserializing a serialized model reproduces its predictions
//! bit-for-bit.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Result, SvmError};
use crate::kernel::KernelSpec;
use crate::model::{BinaryModel, ClassifierModel, SupportVector};
use crate::scaler::ScalerParams;

/// Current model file format version
pub const FORMAT_VERSION: u32 = 1;

/// On-disk document layout; field order here is the file's field order
#[derive(Serialize, Deserialize)]
struct ModelDocument {
    format_version: u32,
    library_version: String,
    kernel: KernelDocument,
    scaling_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    scaler_ranges: Option<Vec<(f64, f64)>>,
    c: f64,
    dim: usize,
    class_labels: Vec<u32>,
    binary_models: Vec<BinaryDocument>,
}

/// Kernel family tag plus parameters
///
/// Kept as an open string tag rather than a serde enum so that unknown
/// families in newer files surface as `UnsupportedKernel` instead of a
/// generic parse failure.
#[derive(Serialize, Deserialize)]
struct KernelDocument {
    family: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    degree: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    gamma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    coef0: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct BinaryDocument {
    labels: (u32, u32),
    bias: f64,
    support_vectors: Vec<SupportVectorDocument>,
}

#[derive(Serialize, Deserialize)]
struct SupportVectorDocument {
    features: Vec<f64>,
    coefficient: f64,
}

impl KernelDocument {
    fn from_spec(spec: &KernelSpec) -> Self {
        let (degree, gamma, coef0) = match *spec {
            KernelSpec::Linear | KernelSpec::Precomputed => (None, None, None),
            KernelSpec::Polynomial {
                degree,
                gamma,
                coef0,
            } => (Some(degree), Some(gamma), Some(coef0)),
            KernelSpec::Rbf { gamma } => (None, Some(gamma), None),
            KernelSpec::Sigmoid { gamma, coef0 } => (None, Some(gamma), Some(coef0)),
        };
        Self {
            family: spec.family().to_string(),
            degree,
            gamma,
            coef0,
        }
    }

    fn to_spec(&self) -> Result<KernelSpec> {
        let gamma = |field: &Option<f64>| {
            field.ok_or_else(|| {
                SvmError::Format(format!("kernel '{}' is missing gamma", self.family))
            })
        };
        let spec = match self.family.as_str() {
            "linear" => KernelSpec::Linear,
            "precomputed" => KernelSpec::Precomputed,
            "rbf" => KernelSpec::Rbf {
                gamma: gamma(&self.gamma)?,
            },
            "polynomial" => KernelSpec::Polynomial {
                degree: self.degree.ok_or_else(|| {
                    SvmError::Format("polynomial kernel is missing degree".to_string())
                })?,
                gamma: gamma(&self.gamma)?,
                coef0: self.coef0.unwrap_or(0.0),
            },
            "sigmoid" => KernelSpec::Sigmoid {
                gamma: gamma(&self.gamma)?,
                coef0: self.coef0.unwrap_or(0.0),
            },
            other => return Err(SvmError::UnsupportedKernel(other.to_string())),
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Serialize a trained model to its textual format
pub fn serialize(model: &ClassifierModel) -> String {
    let document = ModelDocument {
        format_version: FORMAT_VERSION,
        library_version: env!("CARGO_PKG_VERSION").to_string(),
        kernel: KernelDocument::from_spec(model.kernel()),
        scaling_enabled: model.scaler().is_some(),
        scaler_ranges: model.scaler().map(|s| s.ranges().to_vec()),
        c: model.c(),
        dim: model.dim(),
        class_labels: model.labels().to_vec(),
        binary_models: model
            .binary_models()
            .iter()
            .map(|binary| BinaryDocument {
                labels: binary.labels,
                bias: binary.bias,
                support_vectors: binary
                    .support_vectors
                    .iter()
                    .map(|sv| SupportVectorDocument {
                        features: sv.features.clone(),
                        coefficient: sv.coefficient,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document).expect("model document serializes infallibly")
}

/// Rebuild a model from its textual format
pub fn deserialize(text: &str) -> Result<ClassifierModel> {
    let document: ModelDocument =
        serde_json::from_str(text).map_err(|e| SvmError::Format(e.to_string()))?;

    if document.format_version != FORMAT_VERSION {
        return Err(SvmError::Format(format!(
            "unsupported format version {} (this library reads version {FORMAT_VERSION})",
            document.format_version
        )));
    }
    debug!(
        "loading model written by library version {}",
        document.library_version
    );

    let kernel = document.kernel.to_spec()?;

    let scaler = match (document.scaling_enabled, document.scaler_ranges) {
        (true, Some(ranges)) => {
            if ranges.len() != document.dim {
                return Err(SvmError::Format(format!(
                    "scaler has {} ranges for dimensionality {}",
                    ranges.len(),
                    document.dim
                )));
            }
            Some(ScalerParams::from_ranges(ranges))
        }
        (true, None) => {
            return Err(SvmError::Format(
                "scaling enabled but scaler ranges missing".to_string(),
            ))
        }
        (false, _) => None,
    };

    if document.class_labels.len() < 2 {
        return Err(SvmError::Format(
            "model must carry at least 2 class labels".to_string(),
        ));
    }
    let k = document.class_labels.len();
    if document.binary_models.len() != k * (k - 1) / 2 {
        return Err(SvmError::Format(format!(
            "expected {} binary models for {k} classes, found {}",
            k * (k - 1) / 2,
            document.binary_models.len()
        )));
    }

    let binaries = document
        .binary_models
        .into_iter()
        .map(|binary| BinaryModel {
            labels: binary.labels,
            bias: binary.bias,
            support_vectors: binary
                .support_vectors
                .into_iter()
                .map(|sv| SupportVector {
                    features: sv.features,
                    coefficient: sv.coefficient,
                })
                .collect(),
            diagnostics: None,
        })
        .collect();

    Ok(ClassifierModel::from_parts(
        kernel,
        scaler,
        document.class_labels,
        document.c,
        document.dim,
        binaries,
    ))
}

/// Write a model to a file
pub fn save_to_file<P: AsRef<Path>>(model: &ClassifierModel, path: P) -> Result<()> {
    fs::write(path, serialize(model))?;
    Ok(())
}

/// Read a model from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ClassifierModel> {
    let text = fs::read_to_string(path)?;
    deserialize(&text)
}
