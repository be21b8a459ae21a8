//! Image-data reassembly and decoding.

use tracing::{debug, warn};

use crate::decompress::{inflate_zlib, DecodeLimits};
use crate::{Chunk, ChunkType, Error};

/// Concatenation of every `IDAT` payload, in file order.
///
/// Order matters: the zlib stream is defined over the exact reassembled bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDataStream {
    data: Vec<u8>,
    chunk_count: usize,
}

impl ImageDataStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk's payload if it is image data. Returns whether it was used.
    pub fn push(&mut self, chunk: &Chunk) -> bool {
        if chunk.chunk_type != ChunkType::IDAT {
            return false;
        }
        self.data.extend_from_slice(chunk.payload());
        self.chunk_count += 1;
        true
    }

    /// Reassembled compressed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of `IDAT` chunks seen.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Total compressed size.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no image-data bytes were collected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inflate the reassembled stream.
    pub fn decode(&self, limits: DecodeLimits) -> DecodeResult {
        if self.data.is_empty() {
            debug!("no image data to decode");
            return DecodeResult::NoPayload;
        }

        match inflate_zlib(&self.data, limits) {
            Ok(decoded) => {
                debug!(
                    compressed = self.data.len(),
                    decompressed = decoded.len(),
                    "image data decoded"
                );
                DecodeResult::Decoded(decoded)
            }
            Err(e) => {
                warn!(error = %e, compressed = self.data.len(), "image data failed to decode");
                DecodeResult::Failed(e)
            }
        }
    }
}

/// Outcome of decoding the image-data stream.
#[derive(Debug)]
pub enum DecodeResult {
    /// The file had no image-data bytes; decoding was skipped.
    NoPayload,
    /// Decompressed bytes.
    Decoded(Vec<u8>),
    /// The decoder rejected the stream or it exceeded the expansion limit.
    Failed(Error),
}

impl DecodeResult {
    /// Decompressed bytes, if decoding succeeded.
    pub fn decoded(&self) -> Option<&[u8]> {
        match self {
            Self::Decoded(data) => Some(data),
            _ => None,
        }
    }
}

/// Collect image-data payloads from a chunk sequence and decode them.
pub fn aggregate_and_decode<I>(chunks: I, limits: DecodeLimits) -> (ImageDataStream, DecodeResult)
where
    I: IntoIterator<Item = Chunk>,
{
    let mut stream = ImageDataStream::new();
    for chunk in chunks {
        stream.push(&chunk);
    }
    let result = stream.decode(limits);
    (stream, result)
}
