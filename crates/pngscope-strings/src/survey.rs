//! Keyword hits with a bounded fallback preview.

use tracing::debug;

use crate::{scan, PrintableRun, SurveyOptions};

/// Default number of runs shown when no keyword matched.
pub const DEFAULT_PREVIEW_COUNT: usize = 10;

/// An owned printable run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurveyedRun {
    pub offset: usize,
    pub text: String,
}

impl From<PrintableRun<'_>> for SurveyedRun {
    fn from(run: PrintableRun<'_>) -> Self {
        Self {
            offset: run.offset(),
            text: run.text().to_string(),
        }
    }
}

/// Result of surveying one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Survey {
    /// Total number of runs at or above the minimum length.
    pub total_runs: usize,
    /// Runs containing a keyword, in offset order.
    pub keyword_hits: Vec<SurveyedRun>,
    /// The first runs of the buffer, filled only when there are no keyword hits.
    pub preview: Vec<SurveyedRun>,
}

impl Survey {
    /// Whether any keyword matched.
    #[inline]
    pub fn has_hits(&self) -> bool {
        !self.keyword_hits.is_empty()
    }
}

/// Survey a buffer: keyword hits, or the first `preview_count` runs when none matched.
///
/// With no keywords configured every run counts as unmatched, so the result is
/// just the preview.
pub fn survey(data: &[u8], options: &SurveyOptions, preview_count: usize) -> Survey {
    let mut result = Survey::default();

    for run in scan(data, options.min_length) {
        result.total_runs += 1;
        if options.has_keywords() && options.matches(run.text()) {
            result.keyword_hits.push(run.into());
        } else if result.preview.len() < preview_count {
            result.preview.push(run.into());
        }
    }

    if result.has_hits() {
        result.preview.clear();
    }

    debug!(
        scanned = data.len(),
        runs = result.total_runs,
        hits = result.keyword_hits.len(),
        "string survey complete"
    );

    result
}
