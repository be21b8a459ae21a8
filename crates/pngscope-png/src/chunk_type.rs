//! Four-byte chunk type tags.

use std::fmt;

use pngscope_common::ascii;

/// Bit that distinguishes lowercase from uppercase ASCII letters.
const PROPERTY_BIT: u8 = 0x20;

/// A chunk type tag.
///
/// Tags are compared as raw bytes. A tag is not guaranteed to be printable;
/// non-printable bytes render as `?` but never make a tag invalid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

#[allow(non_upper_case_globals)]
impl ChunkType {
    /// Image header.
    pub const IHDR: Self = Self(*b"IHDR");
    /// Palette.
    pub const PLTE: Self = Self(*b"PLTE");
    /// Image data.
    pub const IDAT: Self = Self(*b"IDAT");
    /// Image trailer (terminator).
    pub const IEND: Self = Self(*b"IEND");
    /// Latin-1 text.
    pub const tEXt: Self = Self(*b"tEXt");
    /// Compressed Latin-1 text.
    pub const zTXt: Self = Self(*b"zTXt");
    /// International (UTF-8) text.
    pub const iTXt: Self = Self(*b"iTXt");

    /// Raw tag bytes.
    #[inline]
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Whether every tag byte is visible ASCII.
    #[inline]
    pub fn is_printable(&self) -> bool {
        ascii::all_printable(&self.0)
    }

    /// Ancillary chunks (lowercase first letter) may be ignored by decoders.
    #[inline]
    pub const fn is_ancillary(&self) -> bool {
        self.0[0] & PROPERTY_BIT != 0
    }

    /// Critical chunks (uppercase first letter) are required to display the image.
    #[inline]
    pub const fn is_critical(&self) -> bool {
        !self.is_ancillary()
    }

    /// Private chunks (lowercase second letter) are not registered types.
    #[inline]
    pub const fn is_private(&self) -> bool {
        self.0[1] & PROPERTY_BIT != 0
    }

    /// The reserved bit (third letter) must be uppercase in conforming files.
    #[inline]
    pub const fn is_reserved_bit_set(&self) -> bool {
        self.0[2] & PROPERTY_BIT != 0
    }

    /// Safe-to-copy chunks (lowercase fourth letter) survive unrelated edits.
    #[inline]
    pub const fn is_safe_to_copy(&self) -> bool {
        self.0[3] & PROPERTY_BIT != 0
    }

    /// Whether this is one of the text chunk types.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(*self, Self::tEXt | Self::zTXt | Self::iTXt)
    }

    /// Whether this chunk carries metadata worth retaining for inspection.
    #[inline]
    pub fn is_metadata(&self) -> bool {
        *self == Self::IHDR || self.is_text()
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&ascii::display_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            write!(f, "ChunkType({})", self)
        } else {
            write!(f, "ChunkType({:02x?})", self.0)
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ChunkType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
