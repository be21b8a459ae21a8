//! Error types for PNG parsing.

use thiserror::Error;

use crate::ChunkType;

/// Errors that can occur when walking or decoding a PNG.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] pngscope_common::Error),

    /// The first eight bytes are not the PNG signature.
    #[error("not a PNG file: signature mismatch (got {actual:02x?})")]
    InvalidSignature { actual: Vec<u8> },

    /// A chunk declares more bytes than the file still holds.
    #[error(
        "truncated {} chunk at offset {offset}: needs {needed} bytes but only {available} remain",
        describe_type(.chunk_type)
    )]
    Truncated {
        chunk_type: Option<ChunkType>,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// IHDR payload is not exactly 13 bytes.
    #[error("invalid IHDR length: expected 13 bytes, got {0}")]
    InvalidIhdrLength(usize),

    /// A text chunk could not be split into its fields.
    #[error("malformed {chunk_type} chunk: {reason}")]
    MalformedText {
        chunk_type: ChunkType,
        reason: String,
    },

    /// Unsupported compression method in a zTXt/iTXt chunk.
    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u8),

    /// The zlib stream was rejected by the decoder.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// The zlib stream expands beyond the configured bound.
    #[error("decompressed output exceeds limit of {limit} bytes")]
    ExpansionLimit { limit: usize },
}

fn describe_type(chunk_type: &Option<ChunkType>) -> String {
    chunk_type.map_or_else(|| "unknown".to_string(), |t| t.to_string())
}

/// Result type for PNG operations.
pub type Result<T> = std::result::Result<T, Error>;
