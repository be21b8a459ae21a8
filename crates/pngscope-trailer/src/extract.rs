//! Terminator search and trailing-data extraction.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pngscope_common::search;
use tracing::{debug, info, warn};

use crate::artifact::{artifact_path, write_artifact};
use crate::{Error, Result, TERMINATOR_PATTERN};

/// Bytes found after the first terminator record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    /// Offset of the first terminator record.
    pub terminator_offset: usize,
    /// Offset just past that record, where the trailing data begins.
    pub data_offset: usize,
    /// Everything from `data_offset` to end of file. May be empty.
    pub data: Vec<u8>,
    /// Offsets of every terminator record in the file, ascending.
    pub occurrences: Vec<usize>,
}

impl Trailer {
    /// Number of trailing bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing was appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the terminator record occurs more than once.
    ///
    /// The split still uses the first occurrence, which truncates legitimate
    /// data if an earlier copy sits inside another chunk's payload.
    #[inline]
    pub fn is_suspicious(&self) -> bool {
        self.occurrences.len() > 1
    }
}

/// Locate the first terminator record in `bytes` and return what follows it.
pub fn find_trailer(bytes: &[u8]) -> Result<Trailer> {
    let occurrences = search::find_pattern_all(&TERMINATOR_PATTERN, bytes);
    let terminator_offset = *occurrences.first().ok_or(Error::TerminatorNotFound)?;
    let data_offset = terminator_offset + TERMINATOR_PATTERN.len();

    if occurrences.len() > 1 {
        warn!(
            count = occurrences.len(),
            first = terminator_offset,
            "terminator record occurs more than once"
        );
    }
    debug!(terminator_offset, trailing = bytes.len() - data_offset, "terminator found");

    Ok(Trailer {
        terminator_offset,
        data_offset,
        data: bytes[data_offset..].to_vec(),
        occurrences,
    })
}

/// Read a file and extract its trailing data. The file is never modified.
pub fn extract_trailing<P: AsRef<Path>>(path: P) -> Result<Trailer> {
    let file = File::open(path.as_ref())?;
    if file.metadata()?.len() == 0 {
        return Err(Error::TerminatorNotFound);
    }

    // Read-only mapping, dropped before returning.
    let mmap = unsafe { Mmap::map(&file)? };
    find_trailer(&mmap)
}

/// Trailing data plus where it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub trailer: Trailer,
    /// Artifact path, set only when trailing data was found and written.
    pub artifact: Option<PathBuf>,
}

/// Extract trailing data and, if there is any, save it as `<file_name>.extracted`.
///
/// The artifact goes into `output_dir` when given, otherwise next to the source.
/// An existing artifact is overwritten.
pub fn extract_to_artifact<P: AsRef<Path>>(path: P, output_dir: Option<&Path>) -> Result<Extraction> {
    let path = path.as_ref();
    let trailer = extract_trailing(path)?;

    if trailer.is_empty() {
        debug!(path = %path.display(), "no trailing data");
        return Ok(Extraction {
            trailer,
            artifact: None,
        });
    }

    let target = artifact_path(path, output_dir)?;
    write_artifact(&target, &trailer.data)?;
    info!(
        path = %path.display(),
        artifact = %target.display(),
        bytes = trailer.len(),
        "trailing data saved"
    );

    Ok(Extraction {
        trailer,
        artifact: Some(target),
    })
}
