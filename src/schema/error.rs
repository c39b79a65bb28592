//! Error types for describe metadata

use thiserror::Error;

/// Errors that can occur while decoding describe metadata
#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("Invalid describe JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Describe has no object name")]
    MissingName,
}

/// Result type for describe operations
pub type DescribeResult<T> = Result<T, DescribeError>;
