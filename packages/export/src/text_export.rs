//! Plain-text summary export.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use nc_resilience_scoring::{format_metric_change, format_metric_value, format_number};

use crate::ImpactReport;

/// Renders the fixed plain-text template for `report`.
///
/// # Panics
///
/// Panics if writing to the output `String` fails.
#[must_use]
pub fn report_text(report: &ImpactReport, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    writeln!(out, "NC RESILIENCE IMPACT REPORT").unwrap();
    writeln!(out, "===========================").unwrap();
    match report.county_fips.state_abbr() {
        Some(state) => writeln!(
            out,
            "County: {}, {state} ({})",
            report.county_name, report.county_fips
        )
        .unwrap(),
        None => writeln!(
            out,
            "County: {} ({})",
            report.county_name, report.county_fips
        )
        .unwrap(),
    }
    writeln!(out, "Sector: {}", report.entity_type.label()).unwrap();
    writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    )
    .unwrap();
    writeln!(out, "Overall Impact Score: {}/100", report.overall_score).unwrap();
    match report.resilience_score {
        Some(score) => writeln!(out, "Resilience Score: {}/100", format_number(score)).unwrap(),
        None => writeln!(out, "Resilience Score: no data available").unwrap(),
    }

    writeln!(out).unwrap();
    writeln!(out, "METRICS").unwrap();
    writeln!(out, "-------").unwrap();
    if report.metrics.is_empty() {
        writeln!(out, "No metrics recorded.").unwrap();
    }
    for metric in &report.metrics {
        writeln!(
            out,
            "- {}: {} ({} change)",
            metric.name,
            format_metric_value(metric),
            format_metric_change(metric)
        )
        .unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "INSIGHTS").unwrap();
    writeln!(out, "--------").unwrap();
    for insight in &report.insights {
        writeln!(out, "* {}: {}", insight.title, insight.description).unwrap();
    }

    if !report.events.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "RESILIENCE ACTIVITIES").unwrap();
        writeln!(out, "---------------------").unwrap();
        for event in &report.events {
            writeln!(
                out,
                "- {} {} (impact {})",
                event.date,
                event.title,
                format_number(event.impact_score)
            )
            .unwrap();
        }
    }

    out
}
