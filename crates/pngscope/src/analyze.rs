//! Single-file pipeline.

use std::fs;
use std::path::Path;

use pngscope_png::{ChunkWalker, StopReason, WalkSummary};
use pngscope_strings::survey;
use pngscope_trailer::{extract_to_artifact, Error as TrailerError};
use tracing::{info_span, warn};

use crate::report::{
    DecodeOutcome, ErrorKind, FileReport, ImageDataReport, StageError, TrailingReport,
};
use crate::AnalysisOptions;

/// Analyze one file.
///
/// Never fails: every error is recorded in the returned report. The chunk walk
/// and the trailing-data search are independent, so a file with a broken
/// signature still gets its trailing data recovered.
pub fn analyze_file<P: AsRef<Path>>(path: P, options: &AnalysisOptions) -> FileReport {
    let path = path.as_ref();
    let span = info_span!("analyze", path = %path.display());
    let _guard = span.enter();

    let mut report = FileReport::new(path);
    report.file_size = fs::metadata(path).ok().map(|m| m.len());

    match ChunkWalker::open(path, options.retain) {
        Ok(walker) => apply_walk(&mut report, WalkSummary::collect(walker, options.limits), options),
        Err(e) => {
            warn!(error = %e, "chunk walk failed");
            report.walk_error = Some(StageError::from(&e));
        }
    }

    if options.extract_trailing {
        report.trailing = match extract_to_artifact(path, options.output_dir.as_deref()) {
            Ok(extraction) => extraction.into(),
            Err(e) => {
                if matches!(e, TrailerError::TerminatorNotFound) {
                    warn!("no IEND record found");
                } else {
                    warn!(error = %e, "trailing data extraction failed");
                }
                TrailingReport::Failed {
                    error: StageError::from(&e),
                }
            }
        };
    }

    report
}

fn apply_walk(report: &mut FileReport, summary: WalkSummary, options: &AnalysisOptions) {
    let decoded = summary.image_data.decode(options.limits);

    report.image_data = Some(ImageDataReport {
        chunk_count: summary.image_data.chunk_count(),
        compressed_len: summary.image_data.len(),
        decode: DecodeOutcome::from(&decoded),
    });

    if let Some(bytes) = decoded.decoded() {
        report.strings = Some(survey(bytes, &options.survey, options.preview_count));
    }

    report.chunks = summary.chunks;
    report.ihdr = summary.ihdr;
    report.ihdr_error = summary.ihdr_error;
    report.texts = summary.texts;
    report.walk_error = stop_error(&summary.stop);
    report.stop = Some(summary.stop);
}

/// The failure behind a walk that ended before IEND, if any.
fn stop_error(stop: &StopReason) -> Option<StageError> {
    match *stop {
        StopReason::Truncated {
            chunk_type,
            offset,
            needed,
            available,
        } => Some(StageError::from(&pngscope_png::Error::Truncated {
            chunk_type,
            offset,
            needed,
            available,
        })),
        StopReason::ReadError { ref message } => Some(StageError {
            kind: ErrorKind::Io,
            message: message.clone(),
        }),
        StopReason::Terminator | StopReason::EndOfStream => None,
    }
}
