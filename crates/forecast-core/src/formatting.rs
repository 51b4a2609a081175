//! Small numeric and naming helpers shared by the aggregator, the writer and
//! the logging bootstrap.

use chrono::NaiveDate;

/// Round `value` to `decimals` decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use forecast_core::formatting::round_to;
///
/// assert_eq!(round_to(1.113, 2), 1.11);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// assert_eq!(round_to(-2.5, 0), -3.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Build the `"City(Country)"` label used for documents and file names.
///
/// ```
/// use forecast_core::formatting::location_label;
///
/// assert_eq!(location_label("Paris", "FR"), "Paris(FR)");
/// ```
pub fn location_label(city: &str, country: &str) -> String {
    format!("{}({})", city, country)
}

/// Date stamp embedded in output document names: `2024-01-15`.
pub fn document_date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date stamp embedded in log file names: `2024_01_15`.
pub fn log_date_stamp(date: NaiveDate) -> String {
    date.format("%Y_%m_%d").to_string()
}

/// Derive a day key from an API timestamp such as `"2024-01-15 09:00:00"`.
///
/// Everything before the first space is kept; a timestamp without a space is
/// returned whole. Returns `None` for an empty string.
pub fn day_key_from_timestamp(timestamp: &str) -> Option<&str> {
    let key = timestamp.split(' ').next().unwrap_or_default();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(1.113_333, 2), 1.11);
        assert_eq!(round_to(4.0, 2), 4.0);
        assert_eq!(round_to(-3.456, 2), -3.46);
    }

    #[test]
    fn test_round_to_half_away_from_zero() {
        assert_eq!(round_to(0.5, 0), 1.0);
        assert_eq!(round_to(-0.5, 0), -1.0);
        assert_eq!(round_to(1.5, 0), 2.0);
    }

    #[test]
    fn test_location_label() {
        assert_eq!(location_label("New York", "US"), "New York(US)");
    }

    #[test]
    fn test_date_stamps() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(document_date_stamp(date), "2024-03-07");
        assert_eq!(log_date_stamp(date), "2024_03_07");
    }

    #[test]
    fn test_day_key_from_timestamp() {
        assert_eq!(
            day_key_from_timestamp("2024-01-15 09:00:00"),
            Some("2024-01-15")
        );
        assert_eq!(day_key_from_timestamp("2024-01-15"), Some("2024-01-15"));
        assert_eq!(day_key_from_timestamp(""), None);
        assert_eq!(day_key_from_timestamp(" 09:00:00"), None);
    }
}
