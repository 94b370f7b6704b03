//! Overall impact score.
//!
//! Metrics arrive in heterogeneous units. Each value is normalized onto a
//! 0-100 scale, averaged per category, and the category means are combined
//! with fixed weights. Categories with no metrics drop out of both the
//! numerator and the denominator.

use std::collections::BTreeMap;

use nc_resilience_scoring_models::{ImpactMetric, MetricCategory, MetricUnit};

/// Normalizes a raw value in `unit` onto the 0-100 scale.
///
/// Only the `days`, `months` and `sources` formulas clamp; percentages and
/// `/10` ratings pass through unclamped.
#[must_use]
pub fn normalize(value: f64, unit: MetricUnit) -> f64 {
    match unit {
        MetricUnit::Percent => value,
        // Recovery time: fewer days is better.
        MetricUnit::Days => value.mul_add(-2.0, 100.0).max(0.0),
        MetricUnit::Months => (value * 20.0).min(100.0),
        MetricUnit::Sources => (value * 25.0).min(100.0),
        MetricUnit::OutOfTen => value * 10.0,
    }
}

/// Normalized value of a single metric.
#[must_use]
pub fn normalized_value(metric: &ImpactMetric) -> f64 {
    normalize(metric.value, metric.unit)
}

/// Mean normalized value per category, for categories present in
/// `metrics`.
#[must_use]
pub fn category_means(metrics: &[ImpactMetric]) -> BTreeMap<MetricCategory, f64> {
    let mut sums: BTreeMap<MetricCategory, (f64, u32)> = BTreeMap::new();
    for metric in metrics {
        let entry = sums.entry(metric.category).or_insert((0.0, 0));
        entry.0 += normalized_value(metric);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(category, (sum, count))| (category, sum / f64::from(count)))
        .collect()
}

/// Weighted, unrounded impact score. `None` for an empty metric list.
#[must_use]
pub fn weighted_score(metrics: &[ImpactMetric]) -> Option<f64> {
    let means = category_means(metrics);
    if means.is_empty() {
        return None;
    }

    let (weighted_sum, total_weight) =
        means
            .iter()
            .fold((0.0, 0.0), |(sum, weight), (category, mean)| {
                (
                    category.weight().mul_add(*mean, sum),
                    weight + category.weight(),
                )
            });

    Some(weighted_sum / total_weight)
}

/// Overall impact score, rounded to the nearest integer and clamped to
/// 0-100. An empty metric list scores 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn overall_impact_score(metrics: &[ImpactMetric]) -> u8 {
    let Some(score) = weighted_score(metrics) else {
        return 0;
    };
    score.round().clamp(0.0, 100.0) as u8
}
