//! OpenWeatherMap forecast client.
//!
//! Retrieves the 5 day / 3 hour forecast for a `city,country` query and
//! turns the response into raw samples for the aggregator.
//!
//! API documentation: https://openweathermap.org/forecast5

use std::time::Duration;

use forecast_core::aggregator::ForecastSet;
use forecast_core::error::{ForecastError, Result};
use forecast_core::formatting::day_key_from_timestamp;
use serde::Deserialize;
use tracing::{debug, warn};

const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Unit system requested from the API; `metric` yields Celsius.
const UNITS: &str = "metric";

// ============================================================================
// API Response Structures
// ============================================================================

/// Successful forecast response. Only the fields the pipeline reads.
///
/// Steps stay untyped here and are converted one by one with
/// [`RawSample::from_value`], so a single malformed step does not reject the
/// whole response.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<serde_json::Value>,
}

/// One 3-hour forecast step.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSample {
    /// Timestamp such as `"2024-01-15 09:00:00"` (UTC).
    #[serde(default)]
    pub dt_txt: Option<String>,
    #[serde(default)]
    pub main: Option<RawMain>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMain {
    /// Temperature in the requested units.
    #[serde(default)]
    pub temp: Option<f64>,
}

/// Error payload, e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl RawSample {
    /// Extract a step from arbitrary JSON. Missing or wrongly typed fields
    /// become `None`; a non-object step yields an empty sample.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let dt_txt = value
            .get("dt_txt")
            .and_then(serde_json::Value::as_str)
            .map(String::from);
        let main = value.get("main").map(|main| RawMain {
            temp: main.get("temp").and_then(serde_json::Value::as_f64),
        });
        Self { dt_txt, main }
    }

    /// Day key derived from `dt_txt`, or `None` when absent or blank.
    pub fn day_key(&self) -> Option<&str> {
        self.dt_txt.as_deref().and_then(day_key_from_timestamp)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.main.as_ref().and_then(|m| m.temp)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Blocking HTTP client bound to one API key.
pub struct OpenWeatherClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Build a client for `base_url` (no trailing slash) with a transport
    /// timeout applied to every request.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Endpoint URL without query parameters.
    pub fn forecast_url(&self) -> String {
        format!("{}{}", self.base_url, FORECAST_PATH)
    }

    /// Query parameters sent with a forecast request.
    pub fn query_params(&self, city: &str, country: &str) -> Vec<(&'static str, String)> {
        vec![
            ("appid", self.api_key.clone()),
            ("q", format!("{},{}", city, country)),
            ("units", UNITS.to_string()),
        ]
    }

    /// Fetch the forecast steps for `city`, `country`.
    ///
    /// Non-success responses become [`ForecastError::Upstream`] carrying the
    /// API's `message` field.
    pub fn fetch(&self, city: &str, country: &str) -> Result<Vec<RawSample>> {
        let url = self.forecast_url();
        debug!(%url, city, country, "requesting forecast");

        let response = self
            .http
            .get(&url)
            .query(&self.query_params(city, country))
            .header("Accept", "application/json")
            .send()
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;

        parse_response(status, &body)
    }
}

fn transport_error(err: reqwest::Error) -> ForecastError {
    // Strip the URL: it carries the API key as a query parameter.
    ForecastError::Transport(err.without_url().to_string())
}

// ============================================================================
// Response handling
// ============================================================================

/// Interpret an HTTP status and body.
pub fn parse_response(status: u16, body: &str) -> Result<Vec<RawSample>> {
    if (200..300).contains(&status) {
        let parsed: ForecastResponse = serde_json::from_str(body)?;
        return Ok(parsed.list.iter().map(RawSample::from_value).collect());
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());

    Err(ForecastError::Upstream { status, message })
}

/// Feed every well-formed sample into `set`, in order.
///
/// Returns the number of steps skipped for lacking a timestamp or a
/// temperature.
pub fn collect_into(set: &mut ForecastSet, samples: &[RawSample]) -> usize {
    let mut skipped = 0;
    for (i, sample) in samples.iter().enumerate() {
        match (sample.day_key(), sample.temperature()) {
            (Some(day), Some(temp)) => set.add_sample(day, temp),
            _ => {
                warn!(index = i, dt_txt = ?sample.dt_txt, "skipping malformed forecast entry");
                skipped += 1;
            }
        }
    }
    skipped
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BODY: &str = r#"{
        "cod": "200",
        "cnt": 4,
        "list": [
            {"dt": 1704132000, "main": {"temp": 10.0, "humidity": 80}, "dt_txt": "2024-01-01 18:00:00"},
            {"dt": 1704142800, "main": {"temp": 20.0}, "dt_txt": "2024-01-01 21:00:00"},
            {"dt": 1704153600, "main": {"temp": 5.0}, "dt_txt": "2024-01-02 00:00:00"},
            {"dt": 1704164400, "main": {"temp": 7.0}, "dt_txt": "2024-01-02 03:00:00"}
        ],
        "city": {"name": "Paris", "country": "FR"}
    }"#;

    fn sample(dt_txt: Option<&str>, temp: Option<f64>) -> RawSample {
        RawSample {
            dt_txt: dt_txt.map(String::from),
            main: Some(RawMain { temp }),
        }
    }

    // ── parse_response ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_response_success() {
        let samples = parse_response(200, SAMPLE_BODY).expect("parse");
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].day_key(), Some("2024-01-01"));
        assert_eq!(samples[0].temperature(), Some(10.0));
        assert_eq!(samples[3].day_key(), Some("2024-01-02"));
    }

    #[test]
    fn test_parse_response_upstream_message() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        let err = parse_response(404, body).unwrap_err();
        match err {
            ForecastError::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "city not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_response_upstream_without_json() {
        let err = parse_response(502, "Bad Gateway\n").unwrap_err();
        match err {
            ForecastError::Upstream { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_response_invalid_json_on_success() {
        let err = parse_response(200, "not json").unwrap_err();
        assert!(matches!(err, ForecastError::JsonParse(_)));
    }

    #[test]
    fn test_parse_response_missing_list_is_empty() {
        let samples = parse_response(200, r#"{"cod":"200"}"#).expect("parse");
        assert!(samples.is_empty());
    }

    // ── RawSample ─────────────────────────────────────────────────────────────

    #[test]
    fn test_raw_sample_missing_fields() {
        let raw: RawSample = serde_json::from_str(r#"{"dt": 1}"#).unwrap();
        assert_eq!(raw.day_key(), None);
        assert_eq!(raw.temperature(), None);

        let raw: RawSample = serde_json::from_str(r#"{"main": {}, "dt_txt": ""}"#).unwrap();
        assert_eq!(raw.day_key(), None);
        assert_eq!(raw.temperature(), None);
    }

    // ── collect_into ──────────────────────────────────────────────────────────

    #[test]
    fn test_collect_into_feeds_aggregator() {
        let samples = parse_response(200, SAMPLE_BODY).unwrap();
        let mut set = ForecastSet::for_city("Paris", "FR");

        let skipped = collect_into(&mut set, &samples);
        assert_eq!(skipped, 0);

        let doc = set.finalize().unwrap();
        assert_eq!(doc.forecast_min_temp, 5.0);
        assert_eq!(doc.forecast_max_temp, 20.0);
        assert_eq!(doc.forecast_details.len(), 1);
        assert_eq!(doc.forecast_details[0].date, "2024-01-02");
        assert_eq!(doc.forecast_details[0].temp, 6.0);
        assert_eq!(doc.forecast_details[0].measure_count, 2);
    }

    #[test]
    fn test_collect_into_skips_malformed_entries() {
        let samples = vec![
            sample(Some("2024-01-01 00:00:00"), Some(1.0)),
            sample(None, Some(99.0)),
            sample(Some("2024-01-02 00:00:00"), None),
            RawSample {
                dt_txt: Some("2024-01-02 03:00:00".to_string()),
                main: None,
            },
            sample(Some("2024-01-02 06:00:00"), Some(3.0)),
        ];
        let mut set = ForecastSet::new("X(YY)");

        let skipped = collect_into(&mut set, &samples);
        assert_eq!(skipped, 3);
        assert_eq!(set.total_samples(), 2);
        assert_eq!(set.global_max_temp().unwrap(), 3.0);
    }

    #[test]
    fn test_collect_into_skips_wrongly_typed_entries() {
        let body = r#"{"list": [
            {"dt_txt": "2024-01-01 00:00:00", "main": {"temp": 1.0}},
            {"dt_txt": "2024-01-01 03:00:00", "main": {"temp": "n/a"}},
            {"dt_txt": 1704254400, "main": {"temp": 2.0}},
            null,
            {"dt_txt": "2024-01-02 00:00:00", "main": {"temp": 3}}
        ]}"#;
        let samples = parse_response(200, body).expect("parse");
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[1].temperature(), None);
        assert_eq!(samples[2].day_key(), None);
        assert_eq!(samples[3], RawSample::default());

        let mut set = ForecastSet::new("X(YY)");
        let skipped = collect_into(&mut set, &samples);
        assert_eq!(skipped, 3);
        assert_eq!(set.total_samples(), 2);
        assert_eq!(set.global_min_temp().unwrap(), 1.0);
        assert_eq!(set.global_max_temp().unwrap(), 3.0);
    }

    // ── OpenWeatherClient ─────────────────────────────────────────────────────

    #[test]
    fn test_forecast_url_and_query() {
        let client = OpenWeatherClient::new(
            "http://api.openweathermap.org/",
            "secret",
            Duration::from_secs(5),
        )
        .expect("client");

        assert_eq!(
            client.forecast_url(),
            "http://api.openweathermap.org/data/2.5/forecast"
        );
        assert_eq!(
            client.query_params("Paris", "FR"),
            vec![
                ("appid", "secret".to_string()),
                ("q", "Paris,FR".to_string()),
                ("units", "metric".to_string()),
            ]
        );
    }
}
