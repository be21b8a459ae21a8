//! Artifact naming and all-or-nothing writing.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Error, Result};

/// Suffix appended to the source file name.
pub const ARTIFACT_SUFFIX: &str = ".extracted";

/// Derive `<output_dir or source dir>/<source file name>.extracted`.
///
/// The name depends only on the source file name, so distinct inputs in a batch
/// never collide unless they share a file name and an output directory.
pub fn artifact_path(source: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| Error::NoFileName(source.to_path_buf()))?;

    let mut file_name = name.to_os_string();
    file_name.push(ARTIFACT_SUFFIX);

    let dir = match output_dir {
        Some(dir) => dir,
        None => source.parent().unwrap_or_else(|| Path::new("")),
    };
    Ok(dir.join(file_name))
}

/// Distinguishes staging files of concurrent writes within one process.
static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden `.<name>.<pid>.<n>.partial` sibling of `target`, unique per call.
fn staging_path(target: &Path) -> Result<PathBuf> {
    let name = target
        .file_name()
        .ok_or_else(|| Error::NoFileName(target.to_path_buf()))?;

    let mut staging_name = OsString::from(".");
    staging_name.push(name);
    staging_name.push(format!(
        ".{}.{}.partial",
        std::process::id(),
        STAGING_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    Ok(target.with_file_name(staging_name))
}

/// Staging file that removes itself unless committed.
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Write `data` to `target` completely or not at all.
///
/// Bytes go to a hidden staging file in the same directory, which is synced and
/// then renamed over the target. A missing parent directory is created.
pub fn write_artifact(target: &Path, data: &[u8]) -> Result<()> {
    let mut staging = PartialFile {
        path: staging_path(target)?,
        committed: false,
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&staging.path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&staging.path, target)?;
    staging.committed = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_next_to_source() {
        let path = artifact_path(Path::new("images/rain.png"), None).unwrap();
        assert_eq!(path, PathBuf::from("images/rain.png.extracted"));
    }

    #[test]
    fn test_artifact_path_in_output_dir() {
        let path = artifact_path(Path::new("images/rain.png"), Some(Path::new("out"))).unwrap();
        assert_eq!(path, PathBuf::from("out/rain.png.extracted"));
    }

    #[test]
    fn test_artifact_path_bare_name() {
        let path = artifact_path(Path::new("rain.png"), None).unwrap();
        assert_eq!(path, PathBuf::from("rain.png.extracted"));
    }

    #[test]
    fn test_staging_paths_are_unique() {
        let target = Path::new("out/rain.png.extracted");
        let first = staging_path(target).unwrap();
        let second = staging_path(target).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("out")));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".rain.png.extracted."));
        assert!(name.ends_with(".partial"));
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/rain.png.extracted");

        write_artifact(&target, b"tail").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"tail");
    }

    #[test]
    fn test_concurrent_writes_to_one_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("same.png.extracted");
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 4096]).collect();

        std::thread::scope(|scope| {
            for payload in &payloads {
                let target = &target;
                scope.spawn(move || write_artifact(target, payload).unwrap());
            }
        });

        // Whichever write landed last, the artifact is one payload intact.
        let written = fs::read(&target).unwrap();
        assert!(payloads.contains(&written));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_artifact_path_without_file_name() {
        assert!(matches!(
            artifact_path(Path::new("/"), None),
            Err(Error::NoFileName(_))
        ));
    }
}
