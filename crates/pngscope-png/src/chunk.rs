//! Chunk records and framing constants.

use std::ops::Range;

use crate::ChunkType;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Bytes of framing around every payload: length (4), type (4) and checksum (4).
pub const CHUNK_OVERHEAD: u64 = 12;

/// CRC-32 of the IEND tag with an empty payload.
pub const IEND_CRC: u32 = 0xAE42_6082;

/// The complete IEND record: zero length, `IEND` tag and its fixed checksum.
pub const IEND_RECORD: [u8; 12] = [
    0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82,
];

/// One parsed chunk.
///
/// `payload` is only populated for chunk types the walker was asked to retain;
/// everything else is skipped without being read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Tag bytes.
    pub chunk_type: ChunkType,
    /// Declared payload length.
    pub length: u32,
    /// File offset of the length field.
    pub offset: u64,
    /// Payload bytes, when retained.
    pub payload: Option<Vec<u8>>,
    /// Checksum field as stored in the file. Never verified.
    pub declared_crc: u32,
}

impl Chunk {
    /// Byte range of `[length | type | payload | checksum]` in the source file.
    #[inline]
    pub fn span(&self) -> Range<u64> {
        self.offset..self.end_offset()
    }

    /// File offset just past the checksum field.
    #[inline]
    pub fn end_offset(&self) -> u64 {
        self.offset + CHUNK_OVERHEAD + u64::from(self.length)
    }

    /// File offset of the first payload byte.
    #[inline]
    pub fn payload_offset(&self) -> u64 {
        self.offset + 8
    }

    /// Retained payload, or an empty slice if it was skipped.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    /// Whether this chunk ends the structured part of the file.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.chunk_type == ChunkType::IEND
    }

    /// Compact, payload-free view of this chunk for reporting.
    pub fn summary(&self) -> ChunkSummary {
        ChunkSummary {
            chunk_type: self.chunk_type,
            length: self.length,
            offset: self.offset,
            declared_crc: self.declared_crc,
        }
    }
}

/// A chunk without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChunkSummary {
    pub chunk_type: ChunkType,
    pub length: u32,
    pub offset: u64,
    pub declared_crc: u32,
}
