#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report exports.
//!
//! Turns an in-memory [`ImpactReport`] into CSV, pretty JSON or a
//! plain-text summary, and names the resulting file. Everything here is
//! pure; nothing touches the network.

pub mod csv_export;
pub mod filename;
pub mod json_export;
pub mod progress;
pub mod text_export;

use chrono::{DateTime, Utc};
use nc_resilience_county_models::{CountyFips, EntityType};
use nc_resilience_scoring_models::{ImpactEvent, ImpactMetric, Insight};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

pub use filename::{export_filename, slugify};
pub use progress::{NullProgress, ProgressCallback, null_progress};

/// Errors that can occur while rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing or flushing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The writer produced bytes that are not UTF-8.
    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Output format of an export.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Plain-text summary, offered where a PDF would be.
    Text,
}

impl ExportFormat {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Text]
    }

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }

    /// MIME type for HTTP responses.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

/// Everything shown on a county's impact dashboard, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub county_fips: CountyFips,
    pub county_name: String,
    pub entity_type: EntityType,
    /// Composite impact score (0-100).
    pub overall_score: u8,
    /// Upstream resilience score, when the county has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resilience_score: Option<f64>,
    pub metrics: Vec<ImpactMetric>,
    pub insights: Vec<Insight>,
    pub events: Vec<ImpactEvent>,
}

/// Renders `report` in `format`, stamped with `generated_at`.
///
/// # Errors
///
/// * [`ExportError::Csv`] / [`ExportError::Io`] if the CSV writer fails
/// * [`ExportError::Json`] if the report cannot be serialized
pub fn render(
    report: &ImpactReport,
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    log::debug!(
        "Rendering {format} export for {} ({})",
        report.county_name,
        report.entity_type
    );
    match format {
        ExportFormat::Csv => csv_export::metrics_csv(&report.metrics),
        ExportFormat::Json => json_export::report_json(report, generated_at),
        ExportFormat::Text => Ok(text_export::report_text(report, generated_at)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn every_format_renders() {
        let report = test_support::wake_report();
        let now = Utc::now();
        for format in ExportFormat::all() {
            let body = render(&report, *format, now).unwrap();
            assert!(!body.is_empty(), "{format} export is empty");
        }
    }
}
