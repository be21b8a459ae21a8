//! Common utilities for pngscope.
//!
//! This crate provides foundational types and utilities used across all pngscope crates:
//!
//! - [`BinaryReader`] - Bounds-checked big-endian reading from byte slices
//! - [`ReadExt`] - Short-read tolerant helpers for streaming readers
//! - [`search`] - memchr-backed byte pattern searching
//! - [`ascii`] - Visible-ASCII predicates and Latin-1 decoding

mod error;
mod reader;

pub mod ascii;
pub mod search;

pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
