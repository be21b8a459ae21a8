//! Trailing-data recovery.
//!
//! Data hidden in a PNG is often simply appended after the `IEND` chunk, where
//! decoders stop reading. This crate finds the end of the structured part of a
//! file by a raw search for the complete 12-byte `IEND` record rather than by
//! walking chunks, so it still works on files whose chunk structure is broken.
//!
//! The first occurrence of the record is the boundary. Files where the record
//! occurs more than once are flagged as suspicious, since an earlier copy inside
//! another chunk's payload would cut the split short.
//!
//! # Example
//!
//! ```no_run
//! use pngscope_trailer::extract_to_artifact;
//!
//! let extraction = extract_to_artifact("image.png", None)?;
//! if let Some(path) = &extraction.artifact {
//!     println!("{} bytes saved to {}", extraction.trailer.len(), path.display());
//! }
//! # Ok::<(), pngscope_trailer::Error>(())
//! ```

mod artifact;
mod error;
mod extract;

pub use artifact::{artifact_path, write_artifact, ARTIFACT_SUFFIX};
pub use error::{Error, Result};
pub use extract::{extract_to_artifact, extract_trailing, find_trailer, Extraction, Trailer};

/// The exact byte pattern searched for.
pub use pngscope_png::IEND_RECORD as TERMINATOR_PATTERN;
