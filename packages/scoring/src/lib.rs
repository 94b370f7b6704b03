#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resilience scoring and aggregation.
//!
//! Pure, stateless functions that turn per-county numbers into something a
//! dashboard can show:
//!
//! - [`bucketing`] maps a score to a tier and color for a given call site.
//! - [`aggregation`] normalizes unit-tagged metrics and combines them into
//!   the overall impact score.
//! - [`insights`] derives ordered, templated observations.
//! - [`baseline`] provides the placeholder metric catalog used until the
//!   upstream API serves real impact metrics.

pub mod aggregation;
pub mod baseline;
pub mod bucketing;
pub mod insights;

use nc_resilience_scoring_models::{ImpactMetric, MetricUnit};

pub use aggregation::overall_impact_score;
pub use bucketing::bucket;
pub use insights::generate_insights;

/// Formats a number with at most one decimal place, dropping a trailing
/// `.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    let s = format!("{value:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

/// Formats an amount together with its unit (e.g. `"78%"`, `"4.2 months"`).
#[must_use]
pub fn format_with_unit(value: f64, unit: MetricUnit) -> String {
    let n = format_number(value);
    match unit {
        MetricUnit::Percent => format!("{n}%"),
        MetricUnit::OutOfTen => format!("{n}/10"),
        MetricUnit::Sources if n == "1" => "1 source".to_string(),
        MetricUnit::Sources => format!("{n} sources"),
        MetricUnit::Months if n == "1" => "1 month".to_string(),
        MetricUnit::Months => format!("{n} months"),
        MetricUnit::Days if n == "1" => "1 day".to_string(),
        MetricUnit::Days => format!("{n} days"),
    }
}

/// Formats a metric's value with its unit.
#[must_use]
pub fn format_metric_value(metric: &ImpactMetric) -> String {
    format_with_unit(metric.value, metric.unit)
}

/// Formats a metric's period change with an explicit sign.
#[must_use]
pub fn format_metric_change(metric: &ImpactMetric) -> String {
    let sign = if metric.change > 0.0 { "+" } else { "" };
    format!("{sign}{}", format_with_unit(metric.change, metric.unit))
}
