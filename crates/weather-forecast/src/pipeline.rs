//! One fetch → aggregate → persist cycle.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use forecast_core::aggregator::ForecastSet;
use forecast_core::error::ForecastError;
use forecast_core::settings::{RuntimeConfig, Settings};
use forecast_data::client::{collect_into, OpenWeatherClient, RawSample};
use forecast_data::credentials::load_api_key;
use forecast_data::writer::ForecastWriter;

/// How a run ended when it did not fail outright.
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// The document was written to this path.
    Saved(PathBuf),
    /// The API refused the request; nothing was aggregated.
    UpstreamRejected { status: u16, message: String },
    /// The document was built but could not be written.
    SaveFailed(String),
}

/// Run against the live API described by `config`.
pub fn run(settings: &Settings, config: &RuntimeConfig, today: NaiveDate) -> anyhow::Result<RunOutcome> {
    run_with(settings, config, today, |api_key, city, country| {
        let client = OpenWeatherClient::new(&config.api_base_url, api_key, config.http_timeout)?;
        client.fetch(city, country)
    })
}

/// Run with an explicit fetch step `(api_key, city, country) -> samples`.
///
/// Errors (exit code 1): missing or unreadable credentials, transport
/// failures, undecodable bodies, an empty forecast. Upstream rejections and
/// write failures are logged and reported as a [`RunOutcome`].
pub fn run_with<F>(
    settings: &Settings,
    config: &RuntimeConfig,
    today: NaiveDate,
    fetch: F,
) -> anyhow::Result<RunOutcome>
where
    F: FnOnce(&str, &str, &str) -> forecast_core::error::Result<Vec<RawSample>>,
{
    let Settings { city, country } = settings;
    let mut set = ForecastSet::for_city(city, country);
    let location = set.location().to_string();

    let api_key = load_api_key(&config.api_key_candidates()).map_err(|e| {
        tracing::error!(error = %e, "Failed to load API key");
        e
    })?;

    let samples = match fetch(&api_key, city, country) {
        Ok(samples) => samples,
        Err(ForecastError::Upstream { status, message }) => {
            tracing::error!(%location, status, "Failed to fetch data");
            tracing::error!("{}", message);
            return Ok(RunOutcome::UpstreamRejected { status, message });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("fetching forecast for {}", location));
        }
    };
    tracing::info!(%location, steps = samples.len(), "Data fetched successfully");

    let skipped = collect_into(&mut set, &samples);
    if skipped > 0 {
        tracing::warn!(skipped, "malformed forecast entries ignored");
    }

    let document = set
        .finalize()
        .with_context(|| format!("no usable forecast samples for {}", location))?;

    let writer = ForecastWriter::new(&config.out_dir);
    match writer.save(&document, city, country, today) {
        Ok(path) => Ok(RunOutcome::Saved(path)),
        Err(e) => {
            tracing::error!(%location, error = %e, "Failed to save data");
            Ok(RunOutcome::SaveFailed(e.to_string()))
        }
    }
}
