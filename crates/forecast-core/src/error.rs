use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the forecast pipeline.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Min/max statistics were requested from a set holding no samples.
    #[error("Forecast set is empty: no temperature samples were added")]
    EmptySet,

    /// None of the candidate credential files exist.
    #[error("API key file not found: {0}")]
    ApiKeyNotFound(PathBuf),

    /// The credential file exists but holds no key.
    #[error("API key file is empty: {0}")]
    EmptyApiKey(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The forecast API answered with a non-success status.
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the forecast crates.
pub type Result<T> = std::result::Result<T, ForecastError>;
