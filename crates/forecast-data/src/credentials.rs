//! API key resolution from local files.

use std::path::{Path, PathBuf};

use forecast_core::error::{ForecastError, Result};
use tracing::{debug, info};

/// Read the API key from the first candidate file that exists.
///
/// Fails with [`ForecastError::ApiKeyNotFound`] (naming the first candidate)
/// when none exists. Surrounding whitespace, including the trailing newline
/// most editors add, is stripped.
pub fn load_api_key(candidates: &[PathBuf]) -> Result<String> {
    for path in candidates {
        if !path.is_file() {
            debug!(path = %path.display(), "API key candidate absent");
            continue;
        }
        let key = read_key_file(path)?;
        info!(path = %path.display(), "Reading API key from file");
        return Ok(key);
    }

    let reported = candidates
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(forecast_core::settings::DEFAULT_API_KEY_FILE));
    Err(ForecastError::ApiKeyNotFound(reported))
}

fn read_key_file(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|source| ForecastError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let key = raw.trim();
    if key.is_empty() {
        return Err(ForecastError::EmptyApiKey(path.to_path_buf()));
    }
    Ok(key.to_string())
}
