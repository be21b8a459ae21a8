//! Printable string surveying.
//!
//! Scans arbitrary bytes for maximal runs of visible ASCII (`0x20..=0x7E`), the
//! way the classic `strings` utility does, and optionally keeps only runs that
//! contain one of a set of keywords (case-insensitive).
//!
//! Scanning and filtering are separate steps, so one scan can serve both
//! "keyword hits" and "first N runs" reports.
//!
//! # Example
//!
//! ```
//! use pngscope_strings::{scan, SurveyOptions};
//!
//! let data = b"\x00\x01FLAG{test}\xff\x02abc\x00";
//! let options = SurveyOptions::default().with_keyword("flag");
//!
//! let hits: Vec<_> = options.filter(scan(data, options.min_length)).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].text(), "FLAG{test}");
//! ```

mod options;
mod runs;
mod survey;

pub use options::{SurveyOptions, DEFAULT_MIN_LENGTH};
pub use runs::{scan, PrintableRun, PrintableRuns};
pub use survey::{survey, Survey, SurveyedRun, DEFAULT_PREVIEW_COUNT};
