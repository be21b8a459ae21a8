//! Visible-ASCII helpers.

/// First visible ASCII byte (space).
pub const PRINTABLE_MIN: u8 = 0x20;

/// Last visible ASCII byte (tilde).
pub const PRINTABLE_MAX: u8 = 0x7E;

/// Whether a byte is in the visible-ASCII range `0x20..=0x7E`.
#[inline]
pub const fn is_printable(byte: u8) -> bool {
    byte >= PRINTABLE_MIN && byte <= PRINTABLE_MAX
}

/// Whether every byte of a slice is visible ASCII.
#[inline]
pub fn all_printable(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| is_printable(b))
}

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of the same value.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Render bytes for display, replacing anything outside visible ASCII with `?`.
pub fn display_lossy(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if is_printable(b) { b as char } else { '?' })
        .collect()
}
