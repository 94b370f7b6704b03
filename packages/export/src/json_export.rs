//! Pretty-printed JSON export of a whole report.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{ExportError, ImpactReport};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StampedReport<'a> {
    #[serde(flatten)]
    report: &'a ImpactReport,
    generated_at: String,
}

/// Serializes `report` with an added `generatedAt` RFC 3339 timestamp.
///
/// # Errors
///
/// * [`ExportError::Json`] if serialization fails
pub fn report_json(
    report: &ImpactReport,
    generated_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&StampedReport {
        report,
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    })?)
}
