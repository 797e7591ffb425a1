//! Error handling for the cligen generator.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every variant is terminal for a
//! generator run: nothing is retried and no partial output is left behind.
//!
//! # Examples
//!
//! ```
//! use cligen_core::error::{Error, Result};
//!
//! fn check_paths(has_paths: bool) -> Result<()> {
//!     if !has_paths {
//!         return Err(Error::malformed("missing 'paths' object"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_paths(false).is_err());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for cligen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cligen operations
#[derive(Debug, Error)]
pub enum Error {
    /// The spec file is neither JSON nor YAML
    #[error("unsupported spec format for {}: {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// The document parsed but has no recognizable OpenAPI structure
    #[error("malformed OpenAPI spec: {0}")]
    MalformedSpec(String),

    /// The document is not an OpenAPI 3.x document
    #[error("unsupported OpenAPI version '{0}': only 3.x documents are supported")]
    UnsupportedVersion(String),

    /// A `{placeholder}` in a path template has no `in: path` declaration
    #[error("path parameter '{{{parameter}}}' of {method} {path} has no matching parameter declaration")]
    UnresolvedPathParameter {
        method: String,
        path: String,
        parameter: String,
    },

    /// Two operations produce the same command name
    #[error("command name '{name}' is produced by both {first} and {second}")]
    CommandCollision {
        name: String,
        first: String,
        second: String,
    },

    /// A custom template path was given but does not exist
    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Template syntax or rendering error
    #[error("template render error: {0}")]
    Render(String),

    /// I/O error on a specific file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new malformed-spec error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedSpec(msg.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }

    /// Attach a path to an I/O error
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        // Tera keeps the useful part of the message in the source chain
        let mut message = err.to_string();
        let mut current: &dyn std::error::Error = &err;
        while let Some(source) = current.source() {
            message.push_str(": ");
            message.push_str(&source.to_string());
            current = source;
        }
        Self::Render(message)
    }
}
