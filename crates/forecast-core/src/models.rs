use serde::{Deserialize, Serialize};

/// Statistics for one completed forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Day key, e.g. `"2024-01-15"`.
    pub date: String,
    /// Average temperature in Celsius, rounded to two decimal places.
    pub temp: f64,
    /// Number of samples the average was computed from.
    pub measure_count: usize,
}

/// The finalized forecast written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    /// Location label, e.g. `"Paris(FR)"`.
    pub forecast_location: String,
    /// Lowest single sample across every day, the partial first day included.
    pub forecast_min_temp: f64,
    /// Highest single sample across every day, the partial first day included.
    pub forecast_max_temp: f64,
    /// One entry per day after the first, in insertion order.
    pub forecast_details: Vec<DailySummary>,
}
