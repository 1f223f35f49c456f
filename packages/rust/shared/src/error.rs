//! Error types for docsetgen.
//!
//! Library crates use [`DocsetError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docsetgen operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsetError {
    /// Invalid or incomplete docset configuration. Raised before any
    /// filesystem mutation.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem failure while creating, deleting, or copying.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Search index database error.
    #[error("storage error: {0}")]
    Storage(String),

    /// A build step failed after the documentation folder was moved aside.
    /// `copy` is the only remaining copy of the documentation.
    #[error("{source} (documentation was moved to {copy:?})")]
    Relocated {
        copy: PathBuf,
        source: Box<DocsetError>,
    },

    /// An existing bundle does not have the expected layout.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsetError>;

impl DocsetError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the location of relocated documentation to a build failure.
    pub fn relocated(copy: impl Into<PathBuf>, source: DocsetError) -> Self {
        Self::Relocated {
            copy: copy.into(),
            source: Box::new(source),
        }
    }

    /// Where the documentation was moved to, if the build failed after
    /// relocating it.
    pub fn relocated_copy(&self) -> Option<&std::path::Path> {
        match self {
            Self::Relocated { copy, .. } => Some(copy),
            _ => None,
        }
    }

    /// Whether this error was raised by configuration checks.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
