//! Batch processing.

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

use crate::report::{BatchReport, FileReport};
use crate::{analyze_file, AnalysisOptions};

/// Analyze files in the order given.
pub fn analyze_batch<P: AsRef<Path>>(paths: &[P], options: &AnalysisOptions) -> BatchReport {
    analyze_batch_with(paths, options, |_| {})
}

/// Analyze files in order, calling `on_file` after each one.
pub fn analyze_batch_with<P, F>(paths: &[P], options: &AnalysisOptions, mut on_file: F) -> BatchReport
where
    P: AsRef<Path>,
    F: FnMut(&FileReport),
{
    warn_on_artifact_collisions(paths, options);

    paths
        .iter()
        .map(|path| {
            let report = analyze_file(path, options);
            on_file(&report);
            report
        })
        .collect()
}

/// Analyze files on the rayon pool. Reports keep input order.
#[cfg(feature = "parallel")]
pub fn analyze_batch_parallel<P, F>(paths: &[P], options: &AnalysisOptions, on_file: F) -> BatchReport
where
    P: AsRef<Path> + Sync,
    F: Fn(&FileReport) + Sync,
{
    use rayon::prelude::*;

    warn_on_artifact_collisions(paths, options);

    let files: Vec<FileReport> = paths
        .par_iter()
        .map(|path| {
            let report = analyze_file(path, options);
            on_file(&report);
            report
        })
        .collect();

    BatchReport { files }
}

/// Artifact names derive from file names alone, so a shared output directory
/// makes same-named inputs overwrite each other's artifacts.
fn warn_on_artifact_collisions<P: AsRef<Path>>(paths: &[P], options: &AnalysisOptions) {
    if !options.extract_trailing || options.output_dir.is_none() {
        return;
    }

    let mut seen = HashSet::new();
    for path in paths {
        if let Some(name) = path.as_ref().file_name() {
            if !seen.insert(name) {
                warn!(
                    name = %name.to_string_lossy(),
                    "several inputs share this file name; their artifacts will overwrite each other"
                );
            }
        }
    }
}
