//! Persists finalized forecast documents as indented JSON files.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use forecast_core::error::{ForecastError, Result};
use forecast_core::formatting::{document_date_stamp, location_label};
use forecast_core::models::ForecastDocument;
use serde::Serialize;
use tracing::{info, warn};

/// Indentation used for saved documents.
const JSON_INDENT: &[u8] = b"    ";

/// `"{city}({country})_{YYYY-MM-DD}.json"`.
pub fn document_file_name(city: &str, country: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}.json",
        location_label(city, country),
        document_date_stamp(date)
    )
}

/// Serialize `document` with four-space indentation.
pub fn to_pretty_json(document: &ForecastDocument) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ForecastError::Other(e.into()))
}

/// Writes documents into one output directory.
#[derive(Debug, Clone)]
pub struct ForecastWriter {
    out_dir: PathBuf,
}

impl ForecastWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Full path the document for `city`, `country` on `date` is written to.
    pub fn document_path(&self, city: &str, country: &str, date: NaiveDate) -> PathBuf {
        self.out_dir.join(document_file_name(city, country, date))
    }

    /// Write `document` and return its path.
    ///
    /// The output directory is created when missing. An existing file is
    /// replaced, with a warning.
    pub fn save(
        &self,
        document: &ForecastDocument,
        city: &str,
        country: &str,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let path = self.document_path(city, country, date);
        let json = to_pretty_json(document)?;

        if !self.out_dir.is_dir() {
            std::fs::create_dir_all(&self.out_dir).map_err(|source| ForecastError::FileWrite {
                path: self.out_dir.clone(),
                source,
            })?;
            warn!(dir = %self.out_dir.display(), "output directory created");
        }

        if path.exists() {
            warn!(path = %path.display(), "File already exists, it will be overwritten");
        }

        write_atomically(&path, &json)?;
        info!(
            path = %path.display(),
            location = %document.forecast_location,
            "Data saved successfully"
        );
        Ok(path)
    }
}

/// Write to a sibling temp file then rename over `path`.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let to_write_error = |source: std::io::Error| ForecastError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, contents).map_err(to_write_error)?;
    std::fs::rename(&tmp, path).map_err(to_write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::models::DailySummary;
    use tempfile::TempDir;

    fn sample_document() -> ForecastDocument {
        ForecastDocument {
            forecast_location: "Paris(FR)".to_string(),
            forecast_min_temp: 5.0,
            forecast_max_temp: 20.0,
            forecast_details: vec![DailySummary {
                date: "2024-01-02".to_string(),
                temp: 5.0,
                measure_count: 1,
            }],
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(document_file_name("Paris", "FR", day()), "Paris(FR)_2024-01-01.json");
    }

    #[test]
    fn test_to_pretty_json_uses_four_space_indent() {
        let json = to_pretty_json(&sample_document()).unwrap();
        assert!(json.starts_with("{\n    \"forecast_location\": \"Paris(FR)\""));
        assert!(json.contains("\n        {\n            \"date\": \"2024-01-02\""));
        assert!(json.contains("\"forecast_min_temp\": 5.0"));
        assert!(json.contains("\"measure_count\": 1"));
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let tmp = TempDir::new().expect("tempdir");
        let out = tmp.path().join("out");
        let writer = ForecastWriter::new(&out);

        let path = writer.save(&sample_document(), "Paris", "FR", day()).expect("save");

        assert!(out.is_dir());
        assert_eq!(path, out.join("Paris(FR)_2024-01-01.json"));
        let loaded: ForecastDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, sample_document());
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let writer = ForecastWriter::new(tmp.path());
        let path = writer.document_path("Paris", "FR", day());
        std::fs::write(&path, "stale").unwrap();

        writer.save(&sample_document(), "Paris", "FR", day()).expect("save");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("forecast_location"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_fails_when_out_dir_is_a_file() {
        let tmp = TempDir::new().expect("tempdir");
        let blocker = tmp.path().join("out");
        std::fs::write(&blocker, "not a directory").unwrap();

        let writer = ForecastWriter::new(&blocker);
        let err = writer
            .save(&sample_document(), "Paris", "FR", day())
            .unwrap_err();
        assert!(matches!(err, ForecastError::FileWrite { .. }));
    }
}
