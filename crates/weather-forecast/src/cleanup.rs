//! Directory clearing behind the `clear-forecasts` binary.

use std::io::ErrorKind;
use std::path::Path;

use forecast_core::error::{ForecastError, Result};
use forecast_data::housekeeping::clear_directory;

/// How clearing one directory went.
#[derive(Debug, PartialEq)]
pub enum ClearOutcome {
    /// Every file was removed; carries the count.
    Cleared(usize),
    /// The directory does not exist.
    Missing,
    /// The directory exists but could not be emptied.
    Failed(String),
}

impl From<Result<usize>> for ClearOutcome {
    fn from(result: Result<usize>) -> Self {
        match result {
            Ok(removed) => Self::Cleared(removed),
            Err(ForecastError::Io(e)) if e.kind() == ErrorKind::NotFound => Self::Missing,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Empty `dir` and log the result under `label` (`"out"`, `"logs"`).
pub fn clear_and_log(label: &str, dir: &Path) -> ClearOutcome {
    let outcome = ClearOutcome::from(clear_directory(dir));
    match &outcome {
        ClearOutcome::Cleared(removed) => {
            tracing::info!(dir = %dir.display(), removed, "{} directory cleared", label)
        }
        ClearOutcome::Missing => {
            tracing::error!(dir = %dir.display(), "{} directory not found", label)
        }
        ClearOutcome::Failed(error) => {
            tracing::error!(dir = %dir.display(), %error, "failed to clear {} directory", label)
        }
    }
    outcome
}
