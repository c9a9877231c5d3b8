//! Error types for matrix and network operations.

use thiserror::Error;

/// Errors raised by `Matrix` and `Network` operations.
///
/// Every error is returned to the immediate caller; nothing is retried or
/// recovered internally.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Matrix data must contain at least one row and one column")]
    EmptyMatrix,

    #[error("Ragged matrix data: row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid number of inputs: expected {expected}, got {actual}")]
    InvalidInputSize { expected: usize, actual: usize },

    #[error("Invalid number of targets: expected {expected}, got {actual}")]
    InvalidTargetSize { expected: usize, actual: usize },

    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Malformed data: {0}")]
    Format(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
