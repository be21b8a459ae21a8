//! Byte pattern searching.
//!
//! Thin wrappers over memchr, which already ships SIMD implementations for
//! x86_64 and aarch64 with a scalar fallback.

/// Find the first occurrence of a byte in a slice.
#[inline]
pub fn find_byte(needle: u8, data: &[u8]) -> Option<usize> {
    memchr::memchr(needle, data)
}

/// Find every occurrence of a multi-byte pattern, in ascending offset order.
///
/// Matches do not overlap: after a hit the search resumes past its end.
pub fn find_pattern_all(needle: &[u8], haystack: &[u8]) -> Vec<usize> {
    memchr::memmem::find_iter(haystack, needle).collect()
}
