//! IHDR image header.

use pngscope_common::BinaryReader;
use zerocopy::byteorder::big_endian::U32;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::{Error, Result};

/// On-disk IHDR payload layout.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
struct RawIhdr {
    width: U32,
    height: U32,
    bit_depth: u8,
    color_type: u8,
    compression_method: u8,
    filter_method: u8,
    interlace_method: u8,
}

/// Decoded IHDR fields.
///
/// Values are reported as declared; nothing is validated against the PNG rules
/// for legal bit depth / color type combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl Ihdr {
    /// Payload size of a well-formed IHDR chunk.
    pub const SIZE: usize = 13;

    /// Parse an IHDR payload, which must be exactly 13 bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != Self::SIZE {
            return Err(Error::InvalidIhdrLength(payload.len()));
        }

        let raw: RawIhdr = BinaryReader::new(payload).read_struct()?;

        Ok(Self {
            width: raw.width.get(),
            height: raw.height.get(),
            bit_depth: raw.bit_depth,
            color_type: raw.color_type,
            compression_method: raw.compression_method,
            filter_method: raw.filter_method,
            interlace_method: raw.interlace_method,
        })
    }

    /// Human-readable color type name, if the value is a registered one.
    pub fn color_type_name(&self) -> Option<&'static str> {
        match self.color_type {
            0 => Some("grayscale"),
            2 => Some("truecolor"),
            3 => Some("indexed"),
            4 => Some("grayscale+alpha"),
            6 => Some("truecolor+alpha"),
            _ => None,
        }
    }

    /// Whether the image declares Adam7 interlacing.
    #[inline]
    pub fn is_interlaced(&self) -> bool {
        self.interlace_method == 1
    }
}
