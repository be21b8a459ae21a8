//! Printable-run scanning.

use pngscope_common::ascii::is_printable;

/// A maximal run of visible-ASCII bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrintableRun<'a> {
    offset: usize,
    text: &'a str,
}

impl<'a> PrintableRun<'a> {
    /// Offset of the first byte of the run in the scanned buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The run as text. Always ASCII.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Run length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Runs are never empty; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Iterator over the printable runs of a buffer, in offset order.
///
/// Lazy and finite. Cloning restarts nothing: a clone continues from the same
/// position. Call [`scan`] again to rescan from the beginning.
#[derive(Debug, Clone)]
pub struct PrintableRuns<'a> {
    data: &'a [u8],
    position: usize,
    min_length: usize,
}

/// Scan `data` for runs of visible ASCII at least `min_length` bytes long.
///
/// A `min_length` of zero is treated as one; empty runs are never produced.
#[inline]
pub fn scan(data: &[u8], min_length: usize) -> PrintableRuns<'_> {
    PrintableRuns {
        data,
        position: 0,
        min_length: min_length.max(1),
    }
}

impl<'a> Iterator for PrintableRuns<'a> {
    type Item = PrintableRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.data.len() {
            let rest = &self.data[self.position..];

            let Some(start) = rest.iter().position(|&b| is_printable(b)) else {
                self.position = self.data.len();
                return None;
            };
            let run = &rest[start..];
            let len = run
                .iter()
                .position(|&b| !is_printable(b))
                .unwrap_or(run.len());

            let offset = self.position + start;
            self.position = offset + len;

            if len >= self.min_length {
                // Visible ASCII is always valid UTF-8.
                let text = std::str::from_utf8(&run[..len]).ok()?;
                return Some(PrintableRun { offset, text });
            }
        }
        None
    }
}
