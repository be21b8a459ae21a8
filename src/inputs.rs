//! Command-line input expansion.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Expand command-line inputs into file paths, keeping the given order.
///
/// Directories are walked recursively for `*.png` files, sorted by name.
/// Arguments containing glob metacharacters that do not name an existing file
/// are expanded as patterns. Anything else is passed through unchanged, so a
/// missing file surfaces later as an I/O failure in its own report.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = Path::new(input);

        if path.is_dir() {
            let before = paths.len();
            collect_dir(path, &mut paths);
            if paths.len() == before {
                warn!(dir = %path.display(), "no PNG files in directory");
            }
        } else if is_pattern(input) && !path.exists() {
            let matches =
                glob::glob(input).with_context(|| format!("Invalid glob pattern: {}", input))?;

            let before = paths.len();
            for entry in matches {
                match entry {
                    Ok(p) if p.is_file() => paths.push(p),
                    Ok(p) => debug!(path = %p.display(), "skipping non-file glob match"),
                    Err(e) => warn!(error = %e, "unreadable glob match"),
                }
            }
            if paths.len() == before {
                warn!(pattern = %input, "glob matched no files");
            }
        } else {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths)
}

/// Unreadable entries are logged and skipped.
fn collect_dir(dir: &Path, paths: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && has_png_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
