//! Output and log directory maintenance: clearing, log retention and
//! size-based log rotation.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use forecast_core::error::Result;
use tracing::{debug, warn};

/// Log files above this size are rotated before a run appends to them.
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Log files older than this are removed at start-up.
pub const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Regular files directly inside `dir`, sorted by path.
fn files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("directory not found: {}", dir.display()),
        )
        .into());
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Delete every regular file directly inside `dir`; sub-directories are left
/// alone. Returns the number of files removed.
///
/// A missing directory is an `Io` error of kind `NotFound`.
pub fn clear_directory(dir: &Path) -> Result<usize> {
    let files = files_in(dir)?;
    for file in &files {
        std::fs::remove_file(file)?;
        debug!(path = %file.display(), "removed");
    }
    Ok(files.len())
}

/// Remove log files in `dir` last modified more than `max_age` before `now`.
///
/// Only names containing `.log` are considered. Returns the number removed.
pub fn prune_old_logs(dir: &Path, max_age: Duration, now: SystemTime) -> Result<usize> {
    let mut removed = 0;
    for file in files_in(dir)? {
        if !is_log_file(&file) {
            continue;
        }
        let modified = std::fs::metadata(&file)?.modified()?;
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            std::fs::remove_file(&file)?;
            debug!(path = %file.display(), age_secs = age.as_secs(), "expired log removed");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Move `path` aside to `{path}.{stamp}` when it is larger than `max_bytes`.
///
/// Returns the new location when a rotation happened.
pub fn rotate_if_oversized(path: &Path, max_bytes: u64, stamp: &str) -> Result<Option<PathBuf>> {
    let Ok(meta) = std::fs::metadata(path) else {
        return Ok(None);
    };
    if meta.len() <= max_bytes {
        return Ok(None);
    }

    let mut base = path.as_os_str().to_owned();
    base.push(format!(".{}", stamp));

    // Never clobber an earlier rotation sharing the same stamp.
    let mut rotated = PathBuf::from(&base);
    let mut counter = 1;
    while rotated.exists() {
        let mut candidate = base.clone();
        candidate.push(format!(".{}", counter));
        rotated = PathBuf::from(candidate);
        counter += 1;
    }

    std::fs::rename(path, &rotated)?;
    warn!(
        from = %path.display(),
        to = %rotated.display(),
        bytes = meta.len(),
        "log file rotated"
    );
    Ok(Some(rotated))
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(".log"))
        .unwrap_or(false)
}
