//! Streaming chunk walker.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use pngscope_common::ReadExt;
use tracing::{debug, warn};

use crate::chunk::{Chunk, CHUNK_OVERHEAD, PNG_SIGNATURE};
use crate::{ChunkType, Error, Result};

/// Which chunk payloads the walker reads into memory.
///
/// Image data is always retained; everything not retained is skipped with a
/// seek and never allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RetainPolicy {
    /// Only `IDAT`.
    ImageData,
    /// `IDAT`, `IHDR` and the text chunks.
    #[default]
    Metadata,
    /// Every chunk.
    All,
}

impl RetainPolicy {
    /// Whether payloads of this chunk type are read.
    #[inline]
    pub fn retains(self, chunk_type: ChunkType) -> bool {
        match self {
            Self::ImageData => chunk_type == ChunkType::IDAT,
            Self::Metadata => chunk_type == ChunkType::IDAT || chunk_type.is_metadata(),
            Self::All => true,
        }
    }
}

/// Why a walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// An `IEND` chunk was consumed. Bytes after it were not walked.
    Terminator,
    /// Fewer than four bytes remained where a length field was expected.
    EndOfStream,
    /// A chunk declared more bytes than remain in the file.
    Truncated {
        chunk_type: Option<ChunkType>,
        offset: u64,
        needed: u64,
        available: u64,
    },
    /// The underlying reader failed.
    ReadError { message: String },
}

impl StopReason {
    fn from_error(error: &Error) -> Self {
        match *error {
            Error::Truncated {
                chunk_type,
                offset,
                needed,
                available,
            } => Self::Truncated {
                chunk_type,
                offset,
                needed,
                available,
            },
            ref other => Self::ReadError {
                message: other.to_string(),
            },
        }
    }

    /// Whether the walk reached the terminator chunk.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Terminator)
    }
}

/// Single forward pass over the chunk sequence of one PNG stream.
///
/// Construction verifies the signature. Iteration yields one [`Chunk`] per
/// record until the terminator chunk has been yielded or the stream is
/// exhausted. A truncated record is yielded once as [`Error::Truncated`] and ends
/// the walk; [`ChunkWalker::stop_reason`] then tells why it stopped.
///
/// Declared lengths are checked against the bytes actually left in the stream
/// before anything is read or allocated.
///
/// # Example
///
/// ```no_run
/// use pngscope_png::{ChunkWalker, RetainPolicy};
///
/// let walker = ChunkWalker::open("image.png", RetainPolicy::Metadata)?;
/// for chunk in walker {
///     let chunk = chunk?;
///     println!("{} {} bytes", chunk.chunk_type, chunk.length);
/// }
/// # Ok::<(), pngscope_png::Error>(())
/// ```
#[derive(Debug)]
pub struct ChunkWalker<R> {
    reader: R,
    position: u64,
    end: u64,
    retain: RetainPolicy,
    stop: Option<StopReason>,
}

impl ChunkWalker<BufReader<File>> {
    /// Open a file and verify its signature.
    pub fn open<P: AsRef<Path>>(path: P, retain: RetainPolicy) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file), retain)
    }
}

impl<'a> ChunkWalker<Cursor<&'a [u8]>> {
    /// Walk an in-memory buffer.
    pub fn from_bytes(data: &'a [u8], retain: RetainPolicy) -> Result<Self> {
        Self::new(Cursor::new(data), retain)
    }
}

impl<R: Read + Seek> ChunkWalker<R> {
    /// Wrap a reader positioned at the start of a PNG stream.
    pub fn new(mut reader: R, retain: RetainPolicy) -> Result<Self> {
        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        let mut signature = [0u8; 8];
        let read = reader.read_fully(&mut signature)?;
        if signature[..read] != PNG_SIGNATURE {
            return Err(Error::InvalidSignature {
                actual: signature[..read].to_vec(),
            });
        }

        Ok(Self {
            reader,
            position: start + PNG_SIGNATURE.len() as u64,
            end,
            retain,
            stop: None,
        })
    }

    /// Offset of the next unread byte.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Why the walk ended, once it has.
    #[inline]
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    /// Retention policy in effect.
    #[inline]
    pub fn retain_policy(&self) -> RetainPolicy {
        self.retain
    }

    fn read_chunk(&mut self) -> Result<Option<Chunk>> {
        let offset = self.position;

        let mut length_bytes = [0u8; 4];
        let read = self.reader.read_fully(&mut length_bytes)?;
        if read < length_bytes.len() {
            if read > 0 {
                debug!(offset, read, "ignoring partial length field at end of stream");
            }
            return Ok(None);
        }
        let length = BigEndian::read_u32(&length_bytes);

        let mut tag = [0u8; 4];
        let read = self.reader.read_fully(&mut tag)?;
        if read < tag.len() {
            return Err(Error::Truncated {
                chunk_type: None,
                offset,
                needed: 8,
                available: 4 + read as u64,
            });
        }
        let chunk_type = ChunkType(tag);

        let available = self.end.saturating_sub(offset + 8);
        let needed = u64::from(length) + 4;
        if needed > available {
            warn!(%chunk_type, offset, length, available, "chunk length exceeds remaining bytes");
            return Err(Error::Truncated {
                chunk_type: Some(chunk_type),
                offset,
                needed,
                available,
            });
        }

        let payload = if self.retain.retains(chunk_type) {
            let mut payload = vec![0u8; length as usize];
            self.reader.read_exact(&mut payload)?;
            Some(payload)
        } else {
            self.reader.seek(SeekFrom::Current(i64::from(length)))?;
            None
        };
        let declared_crc = self.reader.read_u32::<BigEndian>()?;

        self.position = offset + CHUNK_OVERHEAD + u64::from(length);

        if !chunk_type.is_printable() {
            warn!(tag = ?chunk_type, offset, "chunk type is not printable ASCII");
        }
        debug!(%chunk_type, offset, length, retained = payload.is_some(), "chunk");

        Ok(Some(Chunk {
            chunk_type,
            length,
            offset,
            payload,
            declared_crc,
        }))
    }
}

impl<R: Read + Seek> Iterator for ChunkWalker<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop.is_some() {
            return None;
        }

        match self.read_chunk() {
            Ok(Some(chunk)) => {
                if chunk.is_terminator() {
                    self.stop = Some(StopReason::Terminator);
                }
                Some(Ok(chunk))
            }
            Ok(None) => {
                self.stop = Some(StopReason::EndOfStream);
                None
            }
            Err(e) => {
                self.stop = Some(StopReason::from_error(&e));
                Some(Err(e))
            }
        }
    }
}
