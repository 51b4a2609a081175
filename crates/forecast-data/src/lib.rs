//! Collaborators around the forecast aggregator.
//!
//! Resolves the API key, fetches and parses the OpenWeatherMap forecast,
//! writes the finalized document to disk and keeps the output and log
//! directories tidy.

pub mod client;
pub mod credentials;
pub mod housekeeping;
pub mod writer;

pub use forecast_core as core;
