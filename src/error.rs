//! Error types for refline.

use std::path::PathBuf;
use thiserror::Error;

use crate::host::LineId;

/// Result type alias for refline operations.
pub type Result<T> = std::result::Result<T, RefLineError>;

/// Errors that can occur while drawing or tracking reference lines.
#[derive(Debug, Error)]
pub enum RefLineError {
    /// A line-drawing call was given too few or malformed parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The solver found an odd number of rectangle edge hits.
    #[error("Line crosses the view boundary {hits} time(s); expected 0, 2 or 4")]
    GeometryInvariantViolation { hits: usize },

    /// The host was asked to update a line it does not own.
    #[error("Unknown line: {0}")]
    UnknownLine(LineId),

    /// Failed to read or write a configuration file.
    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefLineError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a Config error.
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
