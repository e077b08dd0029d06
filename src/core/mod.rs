//! Core types and errors shared across the engine

pub mod error;
pub mod types;

pub use error::{Result, SvmError};
pub use types::{Dataset, OptimizerConfig, PredictionResult, Sample, SmoDiagnostics};
