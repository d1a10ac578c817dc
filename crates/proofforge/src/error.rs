//! Error types for proofforge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProverError {
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Malformed input clause {clause}: {reason}")]
    MalformedClause { clause: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProverError>;
