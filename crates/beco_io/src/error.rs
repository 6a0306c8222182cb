//! Error types for beco_io crate.
//!
//! Provides structured error handling for file persistence, JSON exchange
//! and placement filtering.

use beco_core::FormatError;
use thiserror::Error;

/// Main error type for beco_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Container format errors
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for beco_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The container format error at the root of this error, if any.
    #[must_use]
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Self::Format(e) => Some(e),
            Self::Context { source, .. } => source.format_error(),
            _ => None,
        }
    }
}
