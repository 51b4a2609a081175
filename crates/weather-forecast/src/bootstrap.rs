use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use chrono::{Local, NaiveDate};
use forecast_core::formatting::{location_label, log_date_stamp};
use forecast_data::housekeeping::{self, LOG_RETENTION, MAX_LOG_BYTES};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Log file layout ────────────────────────────────────────────────────────────

/// `{log_dir}/{city}({country})_{YYYY_MM_DD}.log`.
pub fn log_file_path(log_dir: &Path, city: &str, country: &str, date: NaiveDate) -> PathBuf {
    log_dir.join(format!(
        "{}_{}.log",
        location_label(city, country),
        log_date_stamp(date)
    ))
}

/// What [`prepare_log_dir`] did, reported once logging is up.
#[derive(Debug, Default, PartialEq)]
pub struct LogMaintenance {
    pub created_dir: bool,
    pub expired_removed: usize,
    pub rotated_to: Option<PathBuf>,
}

impl LogMaintenance {
    /// Emit the maintenance results through `tracing`.
    pub fn report(&self) {
        if self.created_dir {
            tracing::warn!("log directory created");
        }
        if self.expired_removed > 0 {
            tracing::info!(removed = self.expired_removed, "expired log files removed");
        }
        if let Some(path) = &self.rotated_to {
            tracing::info!(to = %path.display(), "previous log file rotated");
        }
    }
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Make sure `log_dir` exists, drop logs past retention and rotate `log_file`
/// when it has grown past the size limit.
///
/// Runs before the subscriber is installed, so results are returned rather
/// than logged.
pub fn prepare_log_dir(log_dir: &Path, log_file: &Path) -> anyhow::Result<LogMaintenance> {
    let mut maintenance = LogMaintenance::default();

    if !log_dir.is_dir() {
        std::fs::create_dir_all(log_dir)?;
        maintenance.created_dir = true;
    }

    maintenance.expired_removed =
        housekeeping::prune_old_logs(log_dir, LOG_RETENTION, SystemTime::now())?;

    let stamp = Local::now().format("%H%M%S").to_string();
    maintenance.rotated_to = housekeeping::rotate_if_oversized(log_file, MAX_LOG_BYTES, &stamp)?;

    Ok(maintenance)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map an upper-case level name such as `WARNING` onto a `tracing` filter directive.
///
/// Unrecognised names are passed through lowercased so that full
/// `EnvFilter` directives keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" | "SUCCESS" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to stderr and, when `log_file` is given, are appended to that
/// file without ANSI colouring. An unparsable level falls back to `"info"`.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
