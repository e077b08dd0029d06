//! Multi-class Support Vector Machine classification engine
//!
//! Trains maximum-margin classifiers over dense feature vectors with a
//! closed set of kernels, one-vs-one multi-class composition, optional
//! min-max feature scaling, calibrated per-class outputs, and a versioned
//! textual model format.

pub mod api;
pub mod cache;
pub mod core;
pub mod kernel;
pub mod model;
pub mod multiclass;
pub mod persistence;
pub mod predict;
pub mod scaler;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::Svm;
pub use crate::core::{
    Dataset, OptimizerConfig, PredictionResult, Result, Sample, SmoDiagnostics, SvmError,
};
pub use crate::kernel::KernelSpec;
pub use crate::model::{BinaryModel, ClassifierModel, ModelHandle, SupportVector};
pub use crate::scaler::ScalerParams;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
