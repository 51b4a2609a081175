use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ForecastError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Fetch a 5-day weather forecast and save daily temperature statistics
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "weather-forecast",
    about = "Fetch a 5-day weather forecast and save daily temperature statistics",
    version
)]
pub struct Settings {
    /// City name, e.g. "Paris"
    pub city: String,

    /// Country code, e.g. "FR"
    pub country: String,
}

// ── RuntimeConfig (environment) ────────────────────────────────────────────────

pub const ENV_API_KEY_FILE: &str = "WEATHER_API_KEY_FILE";
pub const ENV_OUT_DIR: &str = "WEATHER_OUT_DIR";
pub const ENV_LOG_DIR: &str = "WEATHER_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "WEATHER_LOG_LEVEL";
pub const ENV_API_BASE_URL: &str = "WEATHER_API_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "WEATHER_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_KEY_FILE: &str = "api_key.txt";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_API_BASE_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Paths and knobs that are not exposed as CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Explicit credential file; disables the default lookup chain when set.
    pub api_key_file: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`).
    pub log_level: String,
    pub api_base_url: String,
    pub http_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_key_file: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl RuntimeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup, so tests can
    /// avoid touching the process environment. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get(ENV_API_KEY_FILE) {
            config.api_key_file = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_OUT_DIR) {
            config.out_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_LOG_LEVEL) {
            config.log_level = v.trim().to_uppercase();
        }
        if let Some(v) = get(ENV_API_BASE_URL) {
            config.api_base_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = v.trim().parse().map_err(|_| {
                ForecastError::Config(format!("{ENV_HTTP_TIMEOUT_SECS} must be an integer, got {v:?}"))
            })?;
            if secs == 0 {
                return Err(ForecastError::Config(format!(
                    "{ENV_HTTP_TIMEOUT_SECS} must be at least 1"
                )));
            }
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Credential files to try, in order.
    ///
    /// An explicit file is the only candidate. Otherwise `./api_key.txt`
    /// comes first, then `~/.weather-forecast/api_key.txt`.
    pub fn api_key_candidates(&self) -> Vec<PathBuf> {
        Self::api_key_candidates_in(self.api_key_file.as_deref(), dirs::home_dir().as_deref())
    }

    /// Same as [`api_key_candidates`](Self::api_key_candidates) with an
    /// explicit home directory (used for testing).
    pub fn api_key_candidates_in(explicit: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![path.to_path_buf()];
        }
        let mut candidates = vec![PathBuf::from(DEFAULT_API_KEY_FILE)];
        if let Some(home) = home {
            candidates.push(home.join(".weather-forecast").join(DEFAULT_API_KEY_FILE));
        }
        candidates
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
