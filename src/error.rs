//! Error types for wolffgraph.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("edge {node}-{node} is a self-loop")]
    SelfLoop { node: usize },

    #[error("node id {id} out of range (graph has {n} nodes)")]
    NodeOutOfRange { id: usize, n: usize },

    #[error("invalid weight {weight}: must be finite and positive")]
    InvalidWeight { weight: f64 },

    #[error("insufficient samples: need at least {needed}, have {found}")]
    InsufficientSamples { needed: usize, found: usize },

    #[error("length mismatch: {left} vs {right} samples")]
    LengthMismatch { left: usize, right: usize },

    #[error("field length mismatch: expected {expected} values, found {found}")]
    FieldLength { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
