//! Error types for pngscope-common.

use thiserror::Error;

/// Common error type for pngscope operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing null separator in a keyword/value field.
    #[error("field missing null separator")]
    MissingNullSeparator,
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
