use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool loads, splits, renders, or publishes a notebook.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when notebook JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a git command cannot be started or exits unsuccessfully.
    #[error("{message}")]
    Git { message: String, stderr: String },

    /// Raised when the notebook renderer fails.
    #[error("render failed: {message}")]
    Render { message: String, stderr: String },

    /// Raised when a branch the run cannot do without is missing.
    #[error("a branch called {0} must exist")]
    MissingBranch(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
