//! Human-readable insights derived from impact metrics and events.
//!
//! Insights are emitted in a fixed order. Rules that need at least one
//! metric (or event) are skipped when the input is empty instead of
//! guessing a fallback.

use nc_resilience_county_models::EntityType;
use nc_resilience_scoring_models::{ImpactEvent, ImpactMetric, Insight, InsightCategory};

use crate::aggregation::overall_impact_score;
use crate::{format_metric_change, format_metric_value};

/// Metric id consulted for the agriculture sector insight.
pub const CROP_INSURANCE_METRIC_ID: &str = "crop_insurance";

/// Metric id consulted for the small-business sector insight.
pub const SUPPLIER_DIVERSITY_METRIC_ID: &str = "supplier_diversity";

/// Generates the ordered list of insights for a dashboard.
#[must_use]
pub fn generate_insights(
    metrics: &[ImpactMetric],
    events: &[ImpactEvent],
    entity_type: EntityType,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(strongest) = max_by_value(metrics) {
        insights.push(Insight {
            category: InsightCategory::Strength,
            title: "Strongest Area".to_string(),
            description: format!(
                "{} is your strongest metric at {}. Maintain the practices behind it.",
                strongest.name,
                format_metric_value(strongest),
            ),
        });
    }

    if let Some(weakest) = min_by_value(metrics) {
        insights.push(Insight {
            category: InsightCategory::Improvement,
            title: "Priority Improvement Area".to_string(),
            description: format!(
                "{} at {} offers the greatest opportunity for improvement.",
                weakest.name,
                format_metric_value(weakest),
            ),
        });
    }

    let improving: Vec<&ImpactMetric> = metrics.iter().filter(|m| m.change > 0.0).collect();
    if let Some(best) = first_max_by(&improving, |m| m.change) {
        insights.push(Insight {
            category: InsightCategory::Trend,
            title: "Positive Momentum".to_string(),
            description: format!(
                "{} {} improved this period. {} showed the largest gain ({}).",
                improving.len(),
                plural(improving.len(), "metric", "metrics"),
                best.name,
                format_metric_change(best),
            ),
        });
    }

    let declining: Vec<&ImpactMetric> = metrics.iter().filter(|m| m.change < 0.0).collect();
    if let Some(worst) = first_max_by(&declining, |m| -m.change) {
        insights.push(Insight {
            category: InsightCategory::Warning,
            title: "Areas Needing Attention".to_string(),
            description: format!(
                "{} {} declined this period. {} dropped the most ({}).",
                declining.len(),
                plural(declining.len(), "metric", "metrics"),
                worst.name,
                format_metric_change(worst),
            ),
        });
    }

    if let Some(top) = first_max_by(&events.iter().collect::<Vec<_>>(), |e| e.impact_score) {
        let total: f64 = events.iter().map(|e| e.impact_score).sum();
        insights.push(Insight {
            category: InsightCategory::Effectiveness,
            title: "Implementation Effectiveness".to_string(),
            description: format!(
                "{} resilience {} contributed a combined impact of {total:.0} points. \
                 \"{}\" had the highest impact ({:.0} points).",
                events.len(),
                plural(events.len(), "activity", "activities"),
                top.title,
                top.impact_score,
            ),
        });
    }

    if let Some(insight) = sector_insight(metrics, entity_type) {
        insights.push(insight);
    }

    insights.push(regional_standing(metrics, entity_type));

    insights
}

fn sector_insight(metrics: &[ImpactMetric], entity_type: EntityType) -> Option<Insight> {
    match entity_type {
        EntityType::Agriculture => {
            let coverage = metrics.iter().find(|m| m.id == CROP_INSURANCE_METRIC_ID)?;
            let assessment = if coverage.value >= 70.0 {
                "provides solid protection against weather-related crop losses"
            } else {
                "leaves significant exposure to weather-related crop losses. \
                 Review USDA Risk Management Agency coverage options"
            };
            Some(Insight {
                category: InsightCategory::Sector,
                title: "Agricultural Risk Coverage".to_string(),
                description: format!(
                    "Crop insurance coverage of {} {assessment}.",
                    format_metric_value(coverage)
                ),
            })
        }
        EntityType::SmallBusiness => {
            let suppliers = metrics
                .iter()
                .find(|m| m.id == SUPPLIER_DIVERSITY_METRIC_ID)?;
            let assessment = if suppliers.value >= 3.0 {
                "spreads supply chain risk well across vendors"
            } else {
                "concentrates supply chain risk. Identify backup vendors outside \
                 your county's primary hazard zones"
            };
            Some(Insight {
                category: InsightCategory::Sector,
                title: "Supply Chain Diversification".to_string(),
                description: format!(
                    "Having {} {assessment}.",
                    format_metric_value(suppliers)
                ),
            })
        }
    }
}

fn regional_standing(metrics: &[ImpactMetric], entity_type: EntityType) -> Insight {
    let score = overall_impact_score(metrics);
    let sector = entity_type.label().to_lowercase();
    let description = if score >= 80 {
        format!(
            "Your overall impact score of {score} exceeds regional benchmarks for \
             {sector} operations in North Carolina."
        )
    } else if score >= 60 {
        format!(
            "Your overall impact score of {score} meets regional benchmarks for \
             {sector} operations in North Carolina."
        )
    } else {
        format!(
            "Your overall impact score of {score} is below regional benchmarks for \
             {sector} operations in North Carolina. Focus on your priority \
             improvement area first."
        )
    };

    Insight {
        category: InsightCategory::Benchmark,
        title: "Regional Standing".to_string(),
        description,
    }
}

/// First metric with the strictly greatest value.
fn max_by_value(metrics: &[ImpactMetric]) -> Option<&ImpactMetric> {
    metrics
        .iter()
        .reduce(|best, m| if m.value > best.value { m } else { best })
}

/// First metric with the strictly smallest value.
fn min_by_value(metrics: &[ImpactMetric]) -> Option<&ImpactMetric> {
    metrics
        .iter()
        .reduce(|best, m| if m.value < best.value { m } else { best })
}

/// First item with the strictly greatest key.
fn first_max_by<'a, T>(items: &[&'a T], key: impl Fn(&T) -> f64) -> Option<&'a T> {
    items
        .iter()
        .copied()
        .reduce(|best, item| if key(item) > key(best) { item } else { best })
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nc_resilience_scoring_models::{MetricCategory, MetricUnit};

    fn metric(id: &str, name: &str, value: f64, unit: MetricUnit, change: f64) -> ImpactMetric {
        ImpactMetric {
            id: id.to_string(),
            name: name.to_string(),
            value,
            unit,
            change,
            category: MetricCategory::Preparedness,
        }
    }

    fn event(title: &str, impact_score: f64) -> ImpactEvent {
        ImpactEvent {
            id: title.to_lowercase().replace(' ', "_"),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            impact_score,
        }
    }

    fn titles(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn full_insight_order() {
        let metrics = vec![
            metric("crop_insurance", "Crop Insurance Coverage", 82.0, MetricUnit::Percent, 5.0),
            metric("cash", "Cash Reserves", 3.5, MetricUnit::Months, -0.5),
            metric("plan", "Emergency Plan", 64.0, MetricUnit::Percent, 2.0),
        ];
        let events = vec![event("Installed generator", 12.0), event("Drainage repair", 8.0)];
        let insights = generate_insights(&metrics, &events, EntityType::Agriculture);
        assert_eq!(
            titles(&insights),
            vec![
                "Strongest Area",
                "Priority Improvement Area",
                "Positive Momentum",
                "Areas Needing Attention",
                "Implementation Effectiveness",
                "Agricultural Risk Coverage",
                "Regional Standing",
            ]
        );
        assert!(insights[0].description.contains("Crop Insurance Coverage"));
        assert!(insights[1].description.contains("Cash Reserves"));
        assert!(insights[2].description.starts_with("2 metrics improved"));
        assert!(insights[2].description.contains("Crop Insurance Coverage"));
        assert!(insights[3].description.starts_with("1 metric declined"));
        assert!(insights[4].description.contains("combined impact of 20 points"));
        assert!(insights[4].description.contains("\"Installed generator\""));
    }

    #[test]
    fn empty_metrics_skip_metric_rules() {
        let insights = generate_insights(&[], &[], EntityType::SmallBusiness);
        assert_eq!(titles(&insights), vec!["Regional Standing"]);
        assert!(insights[0].description.contains("score of 0 is below"));
    }

    #[test]
    fn trend_rules_require_changes() {
        let metrics = vec![metric("plan", "Emergency Plan", 64.0, MetricUnit::Percent, 0.0)];
        let insights = generate_insights(&metrics, &[], EntityType::Agriculture);
        let t = titles(&insights);
        assert!(!t.contains(&"Positive Momentum"));
        assert!(!t.contains(&"Areas Needing Attention"));
        assert!(!t.contains(&"Implementation Effectiveness"));
        assert!(!t.contains(&"Agricultural Risk Coverage"));
    }

    #[test]
    fn small_business_sector_uses_supplier_metric() {
        let metrics = vec![metric(
            "supplier_diversity",
            "Supplier Diversity",
            2.0,
            MetricUnit::Sources,
            1.0,
        )];
        let insights = generate_insights(&metrics, &[], EntityType::SmallBusiness);
        let sector = insights
            .iter()
            .find(|i| i.category == InsightCategory::Sector)
            .unwrap();
        assert_eq!(sector.title, "Supply Chain Diversification");
        assert!(sector.description.contains("2 sources"));
        assert!(sector.description.contains("concentrates"));
    }

    #[test]
    fn regional_standing_bands() {
        let standing = |value| {
            let metrics = vec![metric("p", "P", value, MetricUnit::Percent, 0.0)];
            generate_insights(&metrics, &[], EntityType::Agriculture)
                .pop()
                .unwrap()
                .description
        };
        assert!(standing(85.0).contains("exceeds"));
        assert!(standing(80.0).contains("exceeds"));
        assert!(standing(65.0).contains("meets"));
        assert!(standing(40.0).contains("below"));
    }

    #[test]
    fn ties_pick_first_metric() {
        let metrics = vec![
            metric("a", "Alpha", 50.0, MetricUnit::Percent, 0.0),
            metric("b", "Beta", 50.0, MetricUnit::Percent, 0.0),
        ];
        let insights = generate_insights(&metrics, &[], EntityType::Agriculture);
        assert!(insights[0].description.starts_with("Alpha"));
        assert!(insights[1].description.starts_with("Alpha"));
    }
}
