//! pngscope - PNG structural forensics.
//!
//! This crate ties the pngscope crates into a per-file pipeline and a batch
//! driver that never aborts on a single bad file.
//!
//! # Crates
//!
//! - [`pngscope_common`] - Common utilities (binary reading, byte search)
//! - [`pngscope_png`] - Chunk walking, IHDR / text decoding, `IDAT` reassembly
//! - [`pngscope_strings`] - Printable-run survey with keyword filtering
//! - [`pngscope_trailer`] - Data appended after `IEND`
//!
//! # Example
//!
//! ```no_run
//! use pngscope::prelude::*;
//!
//! let mut options = AnalysisOptions::default();
//! options.survey.add_keyword("flag");
//!
//! let report = analyze_batch(&["a.png", "b.png"], &options);
//! for file in &report.files {
//!     println!("{}: {} chunks", file.path.display(), file.chunks.len());
//! }
//! ```

// Re-export all sub-crates
pub use pngscope_common as common;
pub use pngscope_png as png;
pub use pngscope_strings as strings;
pub use pngscope_trailer as trailer;

mod analyze;
mod batch;
mod options;
mod report;

pub use analyze::analyze_file;
pub use batch::{analyze_batch, analyze_batch_with};
#[cfg(feature = "parallel")]
pub use batch::analyze_batch_parallel;
pub use options::AnalysisOptions;
pub use report::{
    BatchReport, DecodeOutcome, ErrorKind, FileReport, ImageDataReport, StageError,
    TrailingReport,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        analyze_batch, analyze_file, AnalysisOptions, BatchReport, DecodeOutcome, FileReport,
        TrailingReport,
    };
    pub use pngscope_png::{ChunkType, ChunkWalker, DecodeLimits, RetainPolicy, WalkSummary};
    pub use pngscope_strings::{scan, survey, SurveyOptions};
    pub use pngscope_trailer::{extract_to_artifact, extract_trailing};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
