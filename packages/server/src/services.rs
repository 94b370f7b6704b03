//! Upstream workflows shared by the HTTP handlers and the CLI.

use nc_resilience_api::{ApiError, ResilienceApi};
use nc_resilience_api_models::AssessRequest;
use nc_resilience_assessment::programs::match_programs;
use nc_resilience_assessment::{Answer, Wizard, WizardError, fields};
use nc_resilience_county_models::fips::nc_fips_for_name;
use nc_resilience_county_models::{
    CountyFips, DisasterRisk, EntityType, HazardType, ResilienceScore, sort_risks_descending,
};
use nc_resilience_export::ImpactReport;
use nc_resilience_server_models::ApiAssessmentResult;

use crate::views;

/// Filename `kind` for county report exports.
pub const REPORT_EXPORT_KIND: &str = "impact-report";

/// Number of top county hazards used to match assistance programs.
pub const PROGRAM_HAZARD_COUNT: usize = 3;

/// The county's highest-risk known hazards, at most
/// [`PROGRAM_HAZARD_COUNT`].
#[must_use]
pub fn top_hazards(mut risks: Vec<DisasterRisk>) -> Vec<HazardType> {
    sort_risks_descending(&mut risks);
    risks
        .into_iter()
        .map(|r| r.hazard_type)
        .filter(|h| *h != HazardType::Other)
        .take(PROGRAM_HAZARD_COUNT)
        .collect()
}

/// Fetches a county and its scores concurrently and builds its impact
/// report.
///
/// # Errors
///
/// Returns the first [`ApiError`] from either request.
pub async fn load_report(
    api: &dyn ResilienceApi,
    fips: &CountyFips,
    entity_type: EntityType,
) -> Result<ImpactReport, ApiError> {
    let (county, scores) =
        futures::try_join!(api.get_county(fips), api.get_county_resilience(fips))?;
    let score = scores.iter().find(|s| s.entity_type == entity_type);
    Ok(views::impact_report(&county, score, entity_type))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn headcount(n: f64) -> u32 {
    n.round().max(0.0) as u32
}

/// Builds the upstream assessment request from the wizard's sector answers.
#[must_use]
pub fn assess_request(wizard: &Wizard, county_fips: &CountyFips) -> AssessRequest {
    let responses = wizard.responses();
    let mut request = AssessRequest::new(county_fips.clone(), wizard.entity_type());
    request.farm_acres = responses.get(fields::FARM_ACRES).and_then(Answer::as_number);
    request.primary_crops = responses
        .get(fields::PRIMARY_CROPS)
        .and_then(Answer::as_checklist)
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    request.employee_count = responses
        .get(fields::EMPLOYEE_COUNT)
        .and_then(Answer::as_number)
        .map(headcount);
    request.business_type = responses
        .get(fields::BUSINESS_TYPE)
        .and_then(Answer::as_text)
        .map(str::to_string);
    request
}

/// Finishes a wizard against the county it names and matches programs.
///
/// `county_fips` overrides the county picked in the location step. The
/// base score comes from the upstream assessment of the wizard's answers,
/// then from the county's published score for the sector, then the
/// default. The county's top hazards drive program matching.
///
/// # Errors
///
/// Returns [`WizardError::MissingRequired`] if the wizard is incomplete.
pub async fn complete_assessment(
    api: &dyn ResilienceApi,
    wizard: &Wizard,
    county_fips: Option<CountyFips>,
) -> Result<ApiAssessmentResult, WizardError> {
    let entity_type = wizard.entity_type();
    let county_fips = county_fips.or_else(|| {
        wizard
            .responses()
            .get(fields::COUNTY)
            .and_then(Answer::as_text)
            .and_then(nc_fips_for_name)
    });

    let (score, hazards) = match &county_fips {
        Some(fips) => {
            let request = assess_request(wizard, fips);
            let (assessed, scores, risks) = futures::join!(
                api.assess(&request),
                api.get_county_resilience(fips),
                api.get_county_risks(fips)
            );
            let score: Option<ResilienceScore> = assessed
                .inspect_err(|e| log::warn!("Upstream assessment failed for {fips}: {e}"))
                .ok()
                .or_else(|| {
                    scores
                        .inspect_err(|e| log::warn!("No base score for {fips}: {e}"))
                        .ok()
                        .and_then(|s| s.into_iter().find(|s| s.entity_type == entity_type))
                });
            let hazards = risks
                .inspect_err(|e| log::warn!("No hazards for {fips}: {e}"))
                .map(top_hazards)
                .unwrap_or_default();
            (score, hazards)
        }
        None => (None, Vec::new()),
    };

    let assessment = wizard.finish(score.as_ref().map(|s| s.overall_score))?;

    Ok(ApiAssessmentResult {
        programs: match_programs(entity_type, county_fips.as_ref(), &hazards),
        uses_county_score: score.is_some(),
        county_fips,
        assessment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(hazard_type: HazardType, risk_score: f64) -> DisasterRisk {
        DisasterRisk {
            county_fips: CountyFips::new("37129").unwrap(),
            hazard_type,
            risk_score,
            annual_loss_expected: None,
            risk_rating: None,
        }
    }

    #[test]
    fn assess_request_carries_sector_answers() {
        let mut wizard = Wizard::new(EntityType::Agriculture);
        wizard
            .answer(fields::FARM_ACRES, Answer::Number(120.0))
            .unwrap();
        wizard
            .answer(
                fields::PRIMARY_CROPS,
                Answer::Checklist(vec!["Soybeans".to_string()]),
            )
            .unwrap();

        let request = assess_request(&wizard, &CountyFips::new("37183").unwrap());
        assert_eq!(request.county_fips.as_str(), "37183");
        assert_eq!(request.entity_type, EntityType::Agriculture);
        assert_eq!(request.farm_acres, Some(120.0));
        assert_eq!(request.primary_crops, vec!["Soybeans".to_string()]);
        assert_eq!(request.employee_count, None);
        assert_eq!(request.business_type, None);
    }

    #[test]
    fn top_hazards_skips_unknown_codes() {
        let hazards = top_hazards(vec![
            risk(HazardType::Tornado, 20.0),
            risk(HazardType::Other, 99.0),
            risk(HazardType::CoastalFlooding, 88.0),
            risk(HazardType::Hurricane, 97.0),
            risk(HazardType::Drought, 41.0),
        ]);
        assert_eq!(
            hazards,
            vec![
                HazardType::Hurricane,
                HazardType::CoastalFlooding,
                HazardType::Drought
            ]
        );
    }
}
