//! Error taxonomy for the analysis engine
//!
//! Per-file errors (parse failures, unreadable files) are recovered by the
//! analyzer and never abort a run; only embedding model initialization
//! failures propagate to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the analysis engine
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Malformed source in a single file; the file is skipped
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The embedding model could not be initialized; fatal to the run
    #[error("embedding model initialization failed: {0}")]
    ModelInit(String),

    /// An embedding request failed after successful initialization
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AnalyzeError {
    /// Whether this error is scoped to a single file and should be
    /// swallowed (and logged) rather than aborting the run.
    pub fn is_per_file(&self) -> bool {
        !matches!(self, AnalyzeError::ModelInit(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
