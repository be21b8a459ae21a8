//! Error types for trailing-data extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when looking for or saving trailing data.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The 12-byte IEND record does not occur anywhere in the file.
    #[error("IEND terminator not found (absent or non-standard)")]
    TerminatorNotFound,

    /// The source path has no file name to derive an artifact name from.
    #[error("cannot derive artifact name from {0}")]
    NoFileName(PathBuf),
}

/// Result type for trailer operations.
pub type Result<T> = std::result::Result<T, Error>;
