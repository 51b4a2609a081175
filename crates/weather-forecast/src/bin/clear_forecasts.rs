//! Empty the forecast output and log directories.

use anyhow::Result;
use forecast_core::settings::RuntimeConfig;
use weather_forecast::{bootstrap, cleanup};

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env()?;
    bootstrap::setup_logging(&config.log_level, None)?;

    for (label, dir) in [("out", &config.out_dir), ("logs", &config.log_dir)] {
        cleanup::clear_and_log(label, dir);
    }

    Ok(())
}
