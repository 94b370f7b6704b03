//! CSV exports. Every field is quoted, embedded quotes are doubled and line
//! breaks inside text fields become spaces, so `N` rows produce exactly
//! `N + 1` lines.

use std::borrow::Cow;
use std::io::Write;

use nc_resilience_county_models::CountyRanking;
use nc_resilience_scoring_models::ImpactMetric;
use serde::Serialize;

use crate::{ExportError, ProgressCallback};

#[derive(Serialize)]
struct MetricRow<'a> {
    #[serde(rename = "Metric ID")]
    id: Cow<'a, str>,
    #[serde(rename = "Metric")]
    name: Cow<'a, str>,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Unit")]
    unit: &'a str,
    #[serde(rename = "Change")]
    change: f64,
}

#[derive(Serialize)]
struct RankingRow<'a> {
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "FIPS")]
    fips: &'a str,
    #[serde(rename = "County")]
    county: Cow<'a, str>,
    #[serde(rename = "Entity Type")]
    entity_type: &'a str,
    #[serde(rename = "Overall Score")]
    overall_score: f64,
}

/// Joins the lines of `text` with single spaces.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\r', '\n']) {
        Cow::Owned(
            text.split(['\r', '\n'])
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        )
    } else {
        Cow::Borrowed(text)
    }
}

fn writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes one row per metric under a header row.
///
/// # Errors
///
/// * [`ExportError::Csv`] if a row fails to serialize
/// * [`ExportError::Io`] if the buffer cannot be flushed
pub fn metrics_csv(metrics: &[ImpactMetric]) -> Result<String, ExportError> {
    let mut wtr = writer(Vec::new());
    if metrics.is_empty() {
        wtr.write_record(["Metric ID", "Metric", "Category", "Value", "Unit", "Change"])?;
    }
    for metric in metrics {
        wtr.serialize(MetricRow {
            id: single_line(&metric.id),
            name: single_line(&metric.name),
            category: metric.category.as_ref(),
            value: metric.value,
            unit: metric.unit.as_ref(),
            change: metric.change,
        })?;
    }
    into_string(wtr)
}

/// Writes a ranking table to `out`, advancing `progress` once per row.
///
/// # Errors
///
/// * [`ExportError::Csv`] if a row fails to serialize or write
/// * [`ExportError::Io`] if `out` cannot be flushed
pub fn write_rankings_csv<W: Write>(
    out: W,
    rankings: &[CountyRanking],
    progress: &dyn ProgressCallback,
) -> Result<(), ExportError> {
    let mut wtr = writer(out);
    if rankings.is_empty() {
        wtr.write_record(["Rank", "FIPS", "County", "Entity Type", "Overall Score"])?;
    }
    progress.set_total(rankings.len() as u64);
    for entry in rankings {
        wtr.serialize(RankingRow {
            rank: entry.rank,
            fips: entry.county_fips.as_str(),
            county: single_line(&entry.county_name),
            entity_type: entry.entity_type.as_ref(),
            overall_score: entry.overall_score,
        })?;
        progress.inc(1);
    }
    wtr.flush()?;
    Ok(())
}
