//! Per-run analysis configuration.

use std::path::PathBuf;

use pngscope_png::{DecodeLimits, RetainPolicy};
use pngscope_strings::{SurveyOptions, DEFAULT_PREVIEW_COUNT};

/// Options applied to every file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Minimum run length and keywords.
    pub survey: SurveyOptions,
    /// Bounds on every decompression.
    pub limits: DecodeLimits,
    /// Runs shown when no keyword matched.
    pub preview_count: usize,
    /// Whether to look for and save trailing data.
    pub extract_trailing: bool,
    /// Where artifacts go; next to each source file when `None`.
    pub output_dir: Option<PathBuf>,
    /// Which chunk payloads the walker keeps.
    pub retain: RetainPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            survey: SurveyOptions::default(),
            limits: DecodeLimits::default(),
            preview_count: DEFAULT_PREVIEW_COUNT,
            extract_trailing: true,
            output_dir: None,
            retain: RetainPolicy::Metadata,
        }
    }
}
