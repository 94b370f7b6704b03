//! Concurrent fan-out of independent API calls.
//!
//! Each loader issues its requests together and fails as soon as any of
//! them fails; partial results are never returned.

use nc_resilience_api_models::{CountyQuery, ResilienceStatistics};
use nc_resilience_county_models::{
    County, CountyFips, DisasterRisk, EntityType, ResilienceScore, sort_risks_descending,
};

use crate::{ApiError, ResilienceApi};

/// Statewide data for the analytics view.
#[derive(Debug, Clone)]
pub struct Overview {
    pub counties: Vec<County>,
    pub statistics: ResilienceStatistics,
}

/// Everything the county details panel needs.
#[derive(Debug, Clone)]
pub struct CountyDetails {
    pub county: County,
    /// The score for the requested entity type. `None` renders as "no
    /// data available".
    pub score: Option<ResilienceScore>,
    /// Hazards, highest risk first.
    pub risks: Vec<DisasterRisk>,
}

/// Fetches all counties (with scores) and the statewide statistics.
///
/// # Errors
///
/// Returns the first [`ApiError`] from either request.
pub async fn load_overview(
    api: &dyn ResilienceApi,
    entity_type: EntityType,
) -> Result<Overview, ApiError> {
    let query = CountyQuery::with_scores(entity_type);
    let (counties, statistics) =
        futures::try_join!(api.list_counties(&query), api.statistics())?;
    log::debug!("Loaded overview: {} counties", counties.len());
    Ok(Overview {
        counties,
        statistics,
    })
}

/// Fetches a county, its resilience scores and its hazard risks.
///
/// # Errors
///
/// Returns the first [`ApiError`] from any of the three requests.
pub async fn load_county_details(
    api: &dyn ResilienceApi,
    fips: &CountyFips,
    entity_type: EntityType,
) -> Result<CountyDetails, ApiError> {
    let (county, scores, mut risks) = futures::try_join!(
        api.get_county(fips),
        api.get_county_resilience(fips),
        api.get_county_risks(fips),
    )?;

    let score = scores.into_iter().find(|s| s.entity_type == entity_type);
    if score.is_none() {
        log::debug!("No {entity_type} resilience score for {fips}");
    }
    sort_risks_descending(&mut risks);

    Ok(CountyDetails {
        county,
        score,
        risks,
    })
}
