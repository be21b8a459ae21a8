//! Bounded zlib decompression.

use flate2::{Decompress, FlushDecompress, Status};

use crate::{Error, Result};

/// Output buffer growth step.
const INFLATE_CHUNK: usize = 64 * 1024;

/// Default ceiling on decompressed output (256 MiB).
pub const DEFAULT_MAX_OUTPUT: usize = 256 * 1024 * 1024;

/// Limits applied to every decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodeLimits {
    /// Maximum number of decompressed bytes before the stream is rejected.
    pub max_output: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }
}

impl DecodeLimits {
    /// Limits with a custom output ceiling.
    pub const fn with_max_output(max_output: usize) -> Self {
        Self { max_output }
    }
}

/// Decompress a zlib stream, refusing to grow past `limits.max_output`.
///
/// The stream must reach its end marker; running out of input first is an
/// error. Input left over after the end marker is ignored. Output grows in
/// fixed steps so a hostile stream cannot force a large up-front allocation.
pub fn inflate_zlib(data: &[u8], limits: DecodeLimits) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::new();

    loop {
        if output.len() == output.capacity() {
            // One byte of headroom past the limit lets us tell "exactly at the
            // limit" apart from "would exceed it".
            let ceiling = limits.max_output.saturating_add(1);
            if output.len() >= ceiling {
                return Err(Error::ExpansionLimit {
                    limit: limits.max_output,
                });
            }
            output.reserve_exact(INFLATE_CHUNK.min(ceiling - output.len()));
        }

        let consumed = inflater.total_in() as usize;
        let produced = output.len();

        let status = inflater
            .decompress_vec(&data[consumed..], &mut output, FlushDecompress::None)
            .map_err(|e| Error::Decompression(e.to_string()))?;

        if output.len() > limits.max_output {
            return Err(Error::ExpansionLimit {
                limit: limits.max_output,
            });
        }

        match status {
            Status::StreamEnd => return Ok(output),
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() as usize == consumed && output.len() == produced;
                if stalled {
                    return Err(Error::Decompression(
                        "incomplete or truncated stream".to_string(),
                    ));
                }
            }
        }
    }
}
