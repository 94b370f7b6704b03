//! Placeholder impact metrics and resilience activities.
//!
//! The upstream API does not serve impact metrics yet. Until it does, the
//! dashboard shows this fixed per-sector catalog. Values are deterministic
//! so that exports and tests are reproducible.

use chrono::NaiveDate;
use nc_resilience_county_models::EntityType;
use nc_resilience_scoring_models::{ImpactEvent, ImpactMetric, MetricCategory, MetricUnit};

use crate::insights::{CROP_INSURANCE_METRIC_ID, SUPPLIER_DIVERSITY_METRIC_ID};

struct MetricSeed {
    id: &'static str,
    name: &'static str,
    value: f64,
    unit: MetricUnit,
    change: f64,
    category: MetricCategory,
}

const AGRICULTURE_METRICS: &[MetricSeed] = &[
    MetricSeed {
        id: "emergency_plan",
        name: "Farm Emergency Plan Completion",
        value: 72.0,
        unit: MetricUnit::Percent,
        change: 8.0,
        category: MetricCategory::Preparedness,
    },
    MetricSeed {
        id: CROP_INSURANCE_METRIC_ID,
        name: "Crop Insurance Coverage",
        value: 64.0,
        unit: MetricUnit::Percent,
        change: 4.0,
        category: MetricCategory::Financial,
    },
    MetricSeed {
        id: "cash_reserves",
        name: "Operating Cash Reserves",
        value: 3.2,
        unit: MetricUnit::Months,
        change: -0.4,
        category: MetricCategory::Financial,
    },
    MetricSeed {
        id: "water_sources",
        name: "Irrigation Water Sources",
        value: 2.0,
        unit: MetricUnit::Sources,
        change: 0.0,
        category: MetricCategory::Infrastructure,
    },
    MetricSeed {
        id: "equipment_readiness",
        name: "Equipment Storm Readiness",
        value: 6.8,
        unit: MetricUnit::OutOfTen,
        change: 0.6,
        category: MetricCategory::Infrastructure,
    },
    MetricSeed {
        id: "recovery_time",
        name: "Average Recovery Time",
        value: 21.0,
        unit: MetricUnit::Days,
        change: -3.0,
        category: MetricCategory::Infrastructure,
    },
    MetricSeed {
        id: "cooperative_network",
        name: "Cooperative Network Strength",
        value: 7.4,
        unit: MetricUnit::OutOfTen,
        change: 0.2,
        category: MetricCategory::Community,
    },
];

const SMALL_BUSINESS_METRICS: &[MetricSeed] = &[
    MetricSeed {
        id: "continuity_plan",
        name: "Business Continuity Plan Coverage",
        value: 58.0,
        unit: MetricUnit::Percent,
        change: 6.0,
        category: MetricCategory::Preparedness,
    },
    MetricSeed {
        id: "business_insurance",
        name: "Business Interruption Insurance",
        value: 47.0,
        unit: MetricUnit::Percent,
        change: -2.0,
        category: MetricCategory::Financial,
    },
    MetricSeed {
        id: "cash_reserves",
        name: "Operating Cash Reserves",
        value: 2.6,
        unit: MetricUnit::Months,
        change: 0.3,
        category: MetricCategory::Financial,
    },
    MetricSeed {
        id: SUPPLIER_DIVERSITY_METRIC_ID,
        name: "Supplier Diversity",
        value: 3.0,
        unit: MetricUnit::Sources,
        change: 1.0,
        category: MetricCategory::Infrastructure,
    },
    MetricSeed {
        id: "data_backup",
        name: "Data Backup Readiness",
        value: 7.9,
        unit: MetricUnit::OutOfTen,
        change: 0.5,
        category: MetricCategory::Infrastructure,
    },
    MetricSeed {
        id: "recovery_time",
        name: "Average Recovery Time",
        value: 14.0,
        unit: MetricUnit::Days,
        change: -2.0,
        category: MetricCategory::Infrastructure,
    },
    MetricSeed {
        id: "local_partnerships",
        name: "Local Partnership Score",
        value: 6.1,
        unit: MetricUnit::OutOfTen,
        change: 0.0,
        category: MetricCategory::Community,
    },
];

/// The placeholder metric catalog for `entity_type`.
#[must_use]
pub fn baseline_metrics(entity_type: EntityType) -> Vec<ImpactMetric> {
    let seeds = match entity_type {
        EntityType::Agriculture => AGRICULTURE_METRICS,
        EntityType::SmallBusiness => SMALL_BUSINESS_METRICS,
    };
    seeds
        .iter()
        .map(|s| ImpactMetric {
            id: s.id.to_string(),
            name: s.name.to_string(),
            value: s.value,
            unit: s.unit,
            change: s.change,
            category: s.category,
        })
        .collect()
}

/// The placeholder resilience activity log for `entity_type`.
#[must_use]
pub fn baseline_events(entity_type: EntityType) -> Vec<ImpactEvent> {
    let seeds: &[(&str, &str, (i32, u32, u32), f64)] = match entity_type {
        EntityType::Agriculture => &[
            ("drainage", "Upgraded field drainage", (2024, 3, 14), 14.0),
            ("generator", "Installed backup generator", (2024, 6, 2), 18.0),
            ("crop_policy", "Expanded crop insurance policy", (2024, 8, 20), 11.0),
        ],
        EntityType::SmallBusiness => &[
            ("cloud_backup", "Moved records to cloud backup", (2024, 2, 9), 12.0),
            ("second_supplier", "Added secondary supplier", (2024, 5, 27), 16.0),
            ("staff_drill", "Ran staff evacuation drill", (2024, 9, 5), 7.0),
        ],
    };
    seeds
        .iter()
        .filter_map(|(id, title, (y, m, d), impact_score)| {
            Some(ImpactEvent {
                id: (*id).to_string(),
                title: (*title).to_string(),
                date: NaiveDate::from_ymd_opt(*y, *m, *d)?,
                impact_score: *impact_score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::overall_impact_score;
    use std::collections::BTreeSet;

    #[test]
    fn every_category_is_represented() {
        for entity_type in EntityType::all() {
            let categories: BTreeSet<MetricCategory> = baseline_metrics(*entity_type)
                .iter()
                .map(|m| m.category)
                .collect();
            assert_eq!(categories.len(), MetricCategory::all().len());
        }
    }

    #[test]
    fn metric_ids_are_unique() {
        for entity_type in EntityType::all() {
            let mut seen = BTreeSet::new();
            for m in baseline_metrics(*entity_type) {
                assert!(seen.insert(m.id.clone()), "Duplicate metric id {}", m.id);
            }
        }
    }

    #[test]
    fn sector_metrics_present() {
        assert!(
            baseline_metrics(EntityType::Agriculture)
                .iter()
                .any(|m| m.id == CROP_INSURANCE_METRIC_ID)
        );
        assert!(
            baseline_metrics(EntityType::SmallBusiness)
                .iter()
                .any(|m| m.id == SUPPLIER_DIVERSITY_METRIC_ID)
        );
    }

    #[test]
    fn catalog_is_deterministic() {
        for entity_type in EntityType::all() {
            assert_eq!(baseline_metrics(*entity_type), baseline_metrics(*entity_type));
            assert_eq!(baseline_events(*entity_type).len(), 3);
            let score = overall_impact_score(&baseline_metrics(*entity_type));
            assert!(score > 0 && score <= 100);
        }
    }
}
