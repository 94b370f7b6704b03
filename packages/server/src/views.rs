//! Shapes upstream records into the server's view models.
//!
//! Missing data is never an error here: a county without a score gets the
//! no-data bucket or the no-data message.

use nc_resilience_api::{CountyDetails, Overview};
use nc_resilience_county_models::{
    County, CountyRanking, DisasterRisk, EntityType, ResilienceScore,
};
use nc_resilience_export::ImpactReport;
use nc_resilience_scoring::aggregation::{category_means, normalized_value};
use nc_resilience_scoring::baseline::{baseline_events, baseline_metrics};
use nc_resilience_scoring::bucketing::policy;
use nc_resilience_scoring::{
    bucket, format_metric_change, format_metric_value, generate_insights, overall_impact_score,
};
use nc_resilience_scoring_models::BucketContext;
use nc_resilience_server_models::{
    ApiAnalytics, ApiCategoryScore, ApiCountyDetails, ApiDashboard, ApiHazard, ApiLegendEntry,
    ApiMap, ApiMapCounty, ApiMetric, ApiRanking, ApiScoreCard, ApiScoreComponent, ApiTierCount,
    NO_DATA_MESSAGE,
};

/// Number of counties listed at each end of the analytics ranking.
pub const ANALYTICS_EXTREMES: usize = 5;

/// Legend rows for `context`.
#[must_use]
pub fn legend(context: BucketContext) -> Vec<ApiLegendEntry> {
    policy(context)
        .legend()
        .into_iter()
        .map(|(label, color)| ApiLegendEntry {
            label: label.to_string(),
            color,
            hex: color.hex().to_string(),
        })
        .collect()
}

fn map_county(county: &County, entity_type: EntityType) -> ApiMapCounty {
    let score = county.score_for(entity_type).map(|s| s.overall_score);
    ApiMapCounty {
        fips_code: county.fips_code.clone(),
        name: county.name.clone(),
        score,
        bucket: bucket(BucketContext::Map, score).into(),
    }
}

/// The choropleth map for `entity_type`.
#[must_use]
pub fn map_view(counties: &[County], entity_type: EntityType) -> ApiMap {
    ApiMap {
        entity_type,
        counties: counties
            .iter()
            .map(|c| map_county(c, entity_type))
            .collect(),
        legend: legend(BucketContext::Map),
    }
}

/// The score card for one resilience score.
#[must_use]
pub fn score_card(score: &ResilienceScore) -> ApiScoreCard {
    let component = |key: &str, label: &str, value: f64| ApiScoreComponent {
        key: key.to_string(),
        label: label.to_string(),
        score: value,
        bucket: bucket(BucketContext::CardRisk, Some(value)).into(),
    };

    ApiScoreCard {
        overall_score: score.overall_score,
        overall_bucket: bucket(BucketContext::CardResilience, Some(score.overall_score)).into(),
        components: vec![
            component("credit", "Credit Risk", score.credit_risk_component),
            component("disaster", "Disaster Risk", score.disaster_risk_component),
            component(
                "supply_chain",
                "Supply Chain Risk",
                score.supply_chain_risk_component,
            ),
        ],
        confidence_lower: score.confidence_lower,
        confidence_upper: score.confidence_upper,
    }
}

fn hazard_row(risk: &DisasterRisk) -> ApiHazard {
    ApiHazard {
        hazard_type: risk.hazard_type,
        name: risk.hazard_type.display_name().to_string(),
        risk_score: risk.risk_score,
        annual_loss_expected: risk.annual_loss_expected,
        risk_rating: risk.risk_rating.clone(),
        bucket: bucket(BucketContext::HazardList, Some(risk.risk_score)).into(),
    }
}

/// The county details panel. Hazards keep the loader's descending order.
#[must_use]
pub fn county_details_view(details: &CountyDetails, entity_type: EntityType) -> ApiCountyDetails {
    let score_card = details.score.as_ref().map(score_card);
    ApiCountyDetails {
        fips_code: details.county.fips_code.clone(),
        name: details.county.name.clone(),
        population: details.county.population,
        area_sq_miles: details.county.area_sq_miles,
        entity_type,
        no_data_message: score_card.is_none().then(|| NO_DATA_MESSAGE.to_string()),
        score_card,
        hazards: details.risks.iter().map(hazard_row).collect(),
    }
}

/// Builds the impact report for a county from the baseline metric catalog.
#[must_use]
pub fn impact_report(
    county: &County,
    score: Option<&ResilienceScore>,
    entity_type: EntityType,
) -> ImpactReport {
    let metrics = baseline_metrics(entity_type);
    let events = baseline_events(entity_type);
    ImpactReport {
        county_fips: county.fips_code.clone(),
        county_name: county.name.clone(),
        entity_type,
        overall_score: overall_impact_score(&metrics),
        resilience_score: score.map(|s| s.overall_score),
        insights: generate_insights(&metrics, &events, entity_type),
        metrics,
        events,
    }
}

/// The impact dashboard for a report.
#[must_use]
pub fn dashboard_view(report: &ImpactReport) -> ApiDashboard {
    ApiDashboard {
        fips_code: report.county_fips.clone(),
        county_name: report.county_name.clone(),
        entity_type: report.entity_type,
        overall_score: report.overall_score,
        overall_bucket: bucket(
            BucketContext::CardResilience,
            Some(f64::from(report.overall_score)),
        )
        .into(),
        metrics: report
            .metrics
            .iter()
            .map(|m| ApiMetric {
                formatted_value: format_metric_value(m),
                formatted_change: format_metric_change(m),
                normalized_value: normalized_value(m),
                metric: m.clone(),
            })
            .collect(),
        category_scores: category_means(&report.metrics)
            .into_iter()
            .map(|(category, score)| ApiCategoryScore {
                category,
                score,
                weight: category.weight(),
            })
            .collect(),
        insights: report.insights.clone(),
        events: report.events.clone(),
    }
}

/// Ranking rows with map buckets.
#[must_use]
pub fn rankings_view(rankings: &[CountyRanking]) -> Vec<ApiRanking> {
    rankings
        .iter()
        .map(|r| ApiRanking {
            rank: r.rank,
            fips_code: r.county_fips.clone(),
            county_name: r.county_name.clone(),
            overall_score: r.overall_score,
            bucket: bucket(BucketContext::Map, Some(r.overall_score)).into(),
        })
        .collect()
}

/// Statewide analytics for `entity_type`.
#[must_use]
pub fn analytics_view(overview: &Overview, entity_type: EntityType) -> ApiAnalytics {
    let mut scored: Vec<ApiMapCounty> = overview
        .counties
        .iter()
        .map(|c| map_county(c, entity_type))
        .filter(|c| c.score.is_some())
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .unwrap_or_default()
            .total_cmp(&a.score.unwrap_or_default())
            .then_with(|| a.name.cmp(&b.name))
    });

    let map_counties: Vec<ApiMapCounty> = overview
        .counties
        .iter()
        .map(|c| map_county(c, entity_type))
        .collect();
    let mut distribution: Vec<ApiTierCount> = policy(BucketContext::Map)
        .legend()
        .into_iter()
        .map(|(label, color)| ApiTierCount {
            tier: Some(label.to_string()),
            color,
            count: map_counties
                .iter()
                .filter(|c| c.bucket.tier.as_deref() == Some(label))
                .count(),
        })
        .collect();
    let no_data = bucket(BucketContext::Map, None);
    distribution.push(ApiTierCount {
        tier: None,
        color: no_data.color,
        count: map_counties.len() - scored.len(),
    });

    let bottom_counties = scored
        .iter()
        .rev()
        .take(ANALYTICS_EXTREMES)
        .cloned()
        .collect();

    ApiAnalytics {
        entity_type,
        total_counties: overview.statistics.total_counties,
        scored_counties: scored.len(),
        statistics: overview.statistics.for_entity_type(entity_type).cloned(),
        distribution,
        top_counties: scored.iter().take(ANALYTICS_EXTREMES).cloned().collect(),
        bottom_counties,
    }
}
