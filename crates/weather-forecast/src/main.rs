use anyhow::Result;
use chrono::Local;
use clap::Parser;
use forecast_core::settings::{RuntimeConfig, Settings};
use weather_forecast::bootstrap;
use weather_forecast::pipeline::{self, RunOutcome};

fn main() -> Result<()> {
    let settings = Settings::parse();
    let config = RuntimeConfig::from_env()?;
    let today = Local::now().date_naive();

    let log_file = bootstrap::log_file_path(&config.log_dir, &settings.city, &settings.country, today);
    let maintenance = bootstrap::prepare_log_dir(&config.log_dir, &log_file)?;
    bootstrap::setup_logging(&config.log_level, Some(log_file.as_path()))?;

    tracing::info!("Weather Forecast v{} starting", env!("CARGO_PKG_VERSION"));
    maintenance.report();

    // Upstream rejections and write failures end the run with exit code 0;
    // anything returned as Err exits with 1.
    match pipeline::run(&settings, &config, today)? {
        RunOutcome::Saved(path) => {
            tracing::debug!(path = %path.display(), "run complete");
        }
        RunOutcome::UpstreamRejected { status, .. } => {
            tracing::debug!(status, "run ended without a document");
        }
        RunOutcome::SaveFailed(reason) => {
            tracing::debug!(%reason, "run ended without a document");
        }
    }

    Ok(())
}
