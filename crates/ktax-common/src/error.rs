//! Error types for ktax
//!
//! Every failure in the pipeline is fatal and propagates to the top-level
//! caller; nothing is retried and nothing is swallowed. Errors that point at
//! the input data carry enough position information (path or 1-based line
//! number) to locate the offending record.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ktax operations
pub type Result<T> = std::result::Result<T, KtaxError>;

/// Main error type for ktax
#[derive(Error, Debug)]
pub enum KtaxError {
    /// A supplied input path does not exist. Raised before any parsing.
    #[error("Input file not found: '{path}'. Verify the path exists and is readable.")]
    MissingInput { path: PathBuf },

    /// A report line did not decode into the six expected fields
    #[error("Malformed report row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// The report's counts do not reconcile into a single rooted tree
    #[error("Inconsistent report at line {line}: {detail}. The inspection report's counts do not reconcile; re-generate it from the classification database.")]
    TreeInconsistency { line: usize, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KtaxError {
    /// Create a missing-input error
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Create a malformed-row error for the given 1-based line number
    pub fn malformed_row(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            reason: reason.into(),
        }
    }

    /// Create a tree-inconsistency error for the given 1-based line number
    pub fn inconsistency(line: usize, detail: impl Into<String>) -> Self {
        Self::TreeInconsistency {
            line,
            detail: detail.into(),
        }
    }
}
