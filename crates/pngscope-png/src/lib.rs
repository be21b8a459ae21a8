//! PNG structural parsing for forensic inspection.
//!
//! A PNG file is an 8-byte signature followed by a sequence of chunks:
//!
//! ```text
//! +--------+--------+----------------+--------+
//! | length |  type  | payload        |  CRC   |
//! | u32 BE | 4 x u8 | `length` bytes | u32 BE |
//! +--------+--------+----------------+--------+
//! ```
//!
//! This crate walks that sequence without trusting declared lengths, decodes the
//! few chunks that matter for inspection (`IHDR` and the text chunks), and
//! reassembles and inflates the `IDAT` stream under an expansion limit.
//! Checksums are exposed but never verified, and pixel data is never unfiltered.
//!
//! # Example
//!
//! ```no_run
//! use pngscope_png::{ChunkWalker, DecodeLimits, RetainPolicy, WalkSummary};
//!
//! let walker = ChunkWalker::open("image.png", RetainPolicy::Metadata)?;
//! let summary = WalkSummary::collect(walker, DecodeLimits::default());
//!
//! for chunk in &summary.chunks {
//!     println!("{} {}", chunk.chunk_type, chunk.length);
//! }
//! let decoded = summary.image_data.decode(DecodeLimits::default());
//! # Ok::<(), pngscope_png::Error>(())
//! ```

mod chunk;
mod chunk_type;
mod error;
mod ihdr;
mod payload;
mod summary;
mod text;
mod walker;

pub mod decompress;

pub use chunk::{Chunk, ChunkSummary, CHUNK_OVERHEAD, IEND_CRC, IEND_RECORD, PNG_SIGNATURE};
pub use chunk_type::ChunkType;
pub use decompress::{inflate_zlib, DecodeLimits};
pub use error::{Error, Result};
pub use ihdr::Ihdr;
pub use payload::{aggregate_and_decode, DecodeResult, ImageDataStream};
pub use summary::WalkSummary;
pub use text::{TextChunk, TextKind, TextValue};
pub use walker::{ChunkWalker, RetainPolicy, StopReason};
