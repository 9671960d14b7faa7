//! Error types for spec rendering and saving

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for render and save operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or saving a spec
#[derive(Error, Debug)]
pub enum Error {
    /// The spec's plain form holds a value with no JSON representation
    #[error("Serialization failed: {0}")]
    SerializationError(String),

    /// The template file could not be located
    #[error("Template not found: {}", .0.display())]
    TemplateNotFoundError(PathBuf),

    /// The template failed to parse or render
    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// A file already exists at the output path and overwrite is disabled
    #[error("File '{}' exists and overwrite is false", .0.display())]
    FileExistsError(PathBuf),

    /// Filesystem failure while reading, removing or writing a file
    #[error("I/O error on {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spec could not be built from the given input
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoError {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
