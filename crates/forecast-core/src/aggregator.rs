//! Temperature aggregation over calendar days.
//!
//! A [`ForecastSet`] collects raw `(day, temperature)` samples in arrival
//! order and turns them into a [`ForecastDocument`]. The first day key ever
//! inserted is treated as the partial current day: it feeds the global
//! min/max but gets no daily summary.

use std::collections::HashMap;

use crate::error::{ForecastError, Result};
use crate::formatting::{location_label, round_to};
use crate::models::{DailySummary, ForecastDocument};

/// Decimal places kept for daily averages.
const AVERAGE_DECIMALS: u32 = 2;

// ── ForecastSet ───────────────────────────────────────────────────────────────

/// Per-run aggregation state for one location.
///
/// Day keys iterate in first-insertion order, never sorted.
#[derive(Debug, Clone, Default)]
pub struct ForecastSet {
    location: String,
    /// `(day key, samples)` in first-insertion order of the key.
    days: Vec<(String, Vec<f64>)>,
    /// Day key → position in `days`.
    index: HashMap<String, usize>,
}

impl ForecastSet {
    /// Create an empty set tagged with `location`.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            days: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty set labelled `"{city}({country})"`.
    pub fn for_city(city: &str, country: &str) -> Self {
        Self::new(location_label(city, country))
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Append `temperature` to the samples of `date`, creating the day on
    /// first use. Neither value is validated.
    pub fn add_sample(&mut self, date: impl Into<String>, temperature: f64) {
        let date = date.into();
        match self.index.get(&date) {
            Some(&pos) => self.days[pos].1.push(temperature),
            None => {
                self.index.insert(date.clone(), self.days.len());
                self.days.push((date, vec![temperature]));
            }
        }
    }

    /// Number of distinct day keys.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of samples recorded for `date` (0 when unknown).
    pub fn sample_count(&self, date: &str) -> usize {
        self.index
            .get(date)
            .map(|&pos| self.days[pos].1.len())
            .unwrap_or(0)
    }

    /// Number of samples across all days.
    pub fn total_samples(&self) -> usize {
        self.days.iter().map(|(_, samples)| samples.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Day keys in first-insertion order.
    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|(date, _)| date.as_str())
    }

    /// Lowest single sample over every day.
    pub fn global_min_temp(&self) -> Result<f64> {
        self.all_samples()
            .reduce(f64::min)
            .ok_or(ForecastError::EmptySet)
    }

    /// Highest single sample over every day.
    pub fn global_max_temp(&self) -> Result<f64> {
        self.all_samples()
            .reduce(f64::max)
            .ok_or(ForecastError::EmptySet)
    }

    /// Build the document for the current state.
    ///
    /// The first inserted day is skipped in `forecast_details` but still
    /// counts toward the global min/max. Calling this twice without adding
    /// samples in between yields equal documents.
    pub fn finalize(&self) -> Result<ForecastDocument> {
        let forecast_min_temp = self.global_min_temp()?;
        let forecast_max_temp = self.global_max_temp()?;

        let forecast_details: Vec<DailySummary> = self
            .days
            .iter()
            .skip(1)
            .map(|(date, samples)| summarize_day(date, samples))
            .collect();

        tracing::debug!(
            location = %self.location,
            days = self.days.len(),
            summaries = forecast_details.len(),
            "forecast set finalized"
        );

        Ok(ForecastDocument {
            forecast_location: self.location.clone(),
            forecast_min_temp,
            forecast_max_temp,
            forecast_details,
        })
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn all_samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.days.iter().flat_map(|(_, samples)| samples.iter().copied())
    }
}

/// Average and count for one day. `samples` is never empty.
fn summarize_day(date: &str, samples: &[f64]) -> DailySummary {
    let count = samples.len();
    let average = samples.iter().sum::<f64>() / count as f64;
    DailySummary {
        date: date.to_string(),
        temp: round_to(average, AVERAGE_DECIMALS),
        measure_count: count,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
