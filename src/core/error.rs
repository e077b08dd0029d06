//! Error types for the classification engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("invalid kernel parameter: {0}")]
    InvalidKernelParameter(String),

    #[error("degenerate kernel: sample {index} has zero self-similarity")]
    DegenerateKernel { index: usize },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("training failed for class pair ({}, {})", labels.0, labels.1)]
    PairwiseTraining {
        labels: (u32, u32),
        #[source]
        source: Box<SvmError>,
    },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid model format: {0}")]
    Format(String),

    #[error("unsupported kernel '{0}' in model file")]
    UnsupportedKernel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SvmError>;
