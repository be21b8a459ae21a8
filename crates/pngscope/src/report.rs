//! Structured per-file and per-batch results.

use std::fmt;
use std::path::{Path, PathBuf};

use pngscope_png::{ChunkSummary, DecodeResult, Ihdr, StopReason, TextChunk};
use pngscope_strings::Survey;
use pngscope_trailer::Extraction;

/// Category of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Signature mismatch.
    FormatMismatch,
    /// A chunk ran past the end of the file.
    Truncation,
    /// The zlib stream was rejected or too large.
    DecodeFailure,
    /// No `IEND` record in the raw bytes.
    TerminatorNotFound,
    /// Missing file, permission denied and friends.
    Io,
    /// Anything else.
    Other,
}

/// A failure recovered at the file-processing boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StageError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&pngscope_png::Error> for StageError {
    fn from(error: &pngscope_png::Error) -> Self {
        use pngscope_png::Error;

        let kind = match error {
            Error::InvalidSignature { .. } => ErrorKind::FormatMismatch,
            Error::Truncated { .. } => ErrorKind::Truncation,
            Error::Decompression(_) | Error::ExpansionLimit { .. } => ErrorKind::DecodeFailure,
            Error::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Other,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

impl From<&pngscope_trailer::Error> for StageError {
    fn from(error: &pngscope_trailer::Error) -> Self {
        use pngscope_trailer::Error;

        let kind = match error {
            Error::TerminatorNotFound => ErrorKind::TerminatorNotFound,
            Error::Io(_) => ErrorKind::Io,
            Error::NoFileName(_) => ErrorKind::Other,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// What happened when the image data was inflated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum DecodeOutcome {
    /// No `IDAT` bytes; nothing to decode.
    NoPayload,
    /// Inflated successfully.
    Decoded { decompressed_len: usize },
    /// The stream was rejected; string scanning was skipped.
    Failed { error: StageError },
}

impl From<&DecodeResult> for DecodeOutcome {
    fn from(result: &DecodeResult) -> Self {
        match result {
            DecodeResult::NoPayload => Self::NoPayload,
            DecodeResult::Decoded(data) => Self::Decoded {
                decompressed_len: data.len(),
            },
            DecodeResult::Failed(e) => Self::Failed { error: e.into() },
        }
    }
}

/// Aggregated `IDAT` stream facts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageDataReport {
    pub chunk_count: usize,
    pub compressed_len: usize,
    pub decode: DecodeOutcome,
}

/// Outcome of the trailing-data search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum TrailingReport {
    /// Extraction was disabled.
    #[default]
    Skipped,
    /// The terminator record was found. `len` may be zero.
    Found {
        terminator_offset: usize,
        data_offset: usize,
        len: usize,
        artifact: Option<PathBuf>,
        /// The terminator record occurs more than once.
        suspicious: bool,
        occurrences: usize,
    },
    /// Extraction failed, including when no terminator exists.
    Failed { error: StageError },
}

impl TrailingReport {
    /// Number of trailing bytes found, if the search succeeded.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Found { len, .. } => Some(*len),
            _ => None,
        }
    }

    /// Saved artifact, if any.
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            Self::Found { artifact, .. } => artifact.as_deref(),
            _ => None,
        }
    }
}

impl From<Extraction> for TrailingReport {
    fn from(extraction: Extraction) -> Self {
        let trailer = extraction.trailer;
        Self::Found {
            terminator_offset: trailer.terminator_offset,
            data_offset: trailer.data_offset,
            len: trailer.len(),
            artifact: extraction.artifact,
            suspicious: trailer.is_suspicious(),
            occurrences: trailer.occurrences.len(),
        }
    }
}

/// Everything learned about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileReport {
    pub path: PathBuf,
    pub file_size: Option<u64>,
    /// Chunks in encounter order.
    pub chunks: Vec<ChunkSummary>,
    pub ihdr: Option<Ihdr>,
    pub ihdr_error: Option<String>,
    pub texts: Vec<TextChunk>,
    /// Why the walk ended; `None` if it never started.
    pub stop: Option<StopReason>,
    /// Why the walk could not start, or why it ended early (truncation, read error).
    pub walk_error: Option<StageError>,
    pub image_data: Option<ImageDataReport>,
    /// Strings from the decompressed image data.
    pub strings: Option<Survey>,
    pub trailing: TrailingReport,
}

impl FileReport {
    /// An empty report for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_size: None,
            chunks: Vec::new(),
            ihdr: None,
            ihdr_error: None,
            texts: Vec::new(),
            stop: None,
            walk_error: None,
            image_data: None,
            strings: None,
            trailing: TrailingReport::Skipped,
        }
    }

    /// Whether the walk ended early because a chunk ran past end of file.
    pub fn is_truncated(&self) -> bool {
        matches!(self.stop, Some(StopReason::Truncated { .. }))
    }

    /// Every recovered failure, walk first.
    pub fn errors(&self) -> Vec<&StageError> {
        let mut errors = Vec::new();
        errors.extend(self.walk_error.as_ref());
        if let Some(ImageDataReport {
            decode: DecodeOutcome::Failed { error },
            ..
        }) = &self.image_data
        {
            errors.push(error);
        }
        if let TrailingReport::Failed { error } = &self.trailing {
            errors.push(error);
        }
        errors
    }

    /// Whether the file could not be processed at all.
    pub fn is_unreadable(&self) -> bool {
        let io_failed = |e: &StageError| e.kind == ErrorKind::Io;
        self.stop.is_none()
            && self.walk_error.as_ref().is_some_and(io_failed)
            && !matches!(self.trailing, TrailingReport::Found { .. })
    }
}

/// Results for a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Files with at least one recovered failure.
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| !f.errors().is_empty()).count()
    }

    /// Files with non-empty trailing data.
    pub fn trailing_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.trailing.len().is_some_and(|len| len > 0))
            .count()
    }
}

impl FromIterator<FileReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = FileReport>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
