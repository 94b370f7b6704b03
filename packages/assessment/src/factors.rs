//! Risk factors, recommendations and the adjusted score.
//!
//! Each rule reads a single answer and fires independently. Missing
//! answers never fire a rule, except the insurance checklist, where no
//! answer counts as no coverage.

use std::collections::BTreeMap;

use nc_resilience_county_models::EntityType;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{Answer, Responses, WizardAssessment, fields};

/// Base score used when the county's real overall score is not known.
pub const DEFAULT_BASE_SCORE: f64 = 65.0;

/// Preparedness levels below this are a risk factor.
pub const LOW_PREPAREDNESS_THRESHOLD: f64 = 30.0;

/// Carrying fewer insurance products than this is a risk factor.
pub const MIN_INSURANCE_PRODUCTS: usize = 3;

/// Cash reserves below this many months are a risk factor.
pub const MIN_CASH_RESERVE_MONTHS: f64 = 3.0;

/// A risk factor derived from wizard answers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RiskFactor {
    #[serde(rename = "Low disaster preparedness")]
    #[strum(serialize = "Low disaster preparedness")]
    LowPreparedness,
    #[serde(rename = "Insufficient insurance coverage")]
    #[strum(serialize = "Insufficient insurance coverage")]
    InsufficientInsurance,
    #[serde(rename = "Limited financial reserves")]
    #[strum(serialize = "Limited financial reserves")]
    LimitedReserves,
    #[serde(rename = "Single-source supply chain dependency")]
    #[strum(serialize = "Single-source supply chain dependency")]
    SingleSourceSupply,
    #[serde(rename = "No written emergency plan")]
    #[strum(serialize = "No written emergency plan")]
    NoEmergencyPlan,
    #[serde(rename = "Repeated disaster exposure")]
    #[strum(serialize = "Repeated disaster exposure")]
    RepeatedDisasters,
}

fn number(responses: &Responses, field: &str) -> Option<f64> {
    responses.get(field).and_then(Answer::as_number)
}

fn checklist_len(responses: &Responses, field: &str) -> usize {
    responses
        .get(field)
        .and_then(Answer::as_checklist)
        .map_or(0, <[String]>::len)
}

/// Derives the risk factors triggered by `responses`, in a fixed order.
#[must_use]
pub fn generate_risk_factors(responses: &Responses) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if number(responses, fields::PREPAREDNESS_LEVEL)
        .is_some_and(|level| level < LOW_PREPAREDNESS_THRESHOLD)
    {
        factors.push(RiskFactor::LowPreparedness);
    }

    if checklist_len(responses, fields::INSURANCE_COVERAGE) < MIN_INSURANCE_PRODUCTS {
        factors.push(RiskFactor::InsufficientInsurance);
    }

    if number(responses, fields::CASH_RESERVE_MONTHS)
        .is_some_and(|months| months < MIN_CASH_RESERVE_MONTHS)
    {
        factors.push(RiskFactor::LimitedReserves);
    }

    if number(responses, fields::SUPPLIER_COUNT).is_some_and(|count| count <= 1.0) {
        factors.push(RiskFactor::SingleSourceSupply);
    }

    if responses
        .get(fields::HAS_EMERGENCY_PLAN)
        .and_then(Answer::as_bool)
        == Some(false)
    {
        factors.push(RiskFactor::NoEmergencyPlan);
    }

    if checklist_len(responses, fields::PAST_DISASTERS) >= 2 {
        factors.push(RiskFactor::RepeatedDisasters);
    }

    factors
}

/// One recommendation per risk factor, worded for `entity_type`. With no
/// risk factors a single maintenance recommendation is returned.
#[must_use]
pub fn generate_recommendations(factors: &[RiskFactor], entity_type: EntityType) -> Vec<String> {
    if factors.is_empty() {
        return vec![
            "Your answers show no major gaps. Review your emergency plan and coverage \
             once a year and before each hurricane season."
                .to_string(),
        ];
    }

    factors
        .iter()
        .map(|factor| recommendation(*factor, entity_type).to_string())
        .collect()
}

const fn recommendation(factor: RiskFactor, entity_type: EntityType) -> &'static str {
    match (factor, entity_type) {
        (RiskFactor::LowPreparedness, EntityType::Agriculture) => {
            "Work with your county's Cooperative Extension agent to build a farm \
             disaster preparedness checklist covering livestock, equipment and stored crops."
        }
        (RiskFactor::LowPreparedness, EntityType::SmallBusiness) => {
            "Use the SBA's disaster preparedness resources to identify critical \
             operations and the steps needed to protect them."
        }
        (RiskFactor::InsufficientInsurance, EntityType::Agriculture) => {
            "Talk to a crop insurance agent about Federal Crop Insurance and NAP \
             coverage for crops that are not otherwise insurable."
        }
        (RiskFactor::InsufficientInsurance, EntityType::SmallBusiness) => {
            "Review business interruption and flood coverage with your agent; standard \
             property policies exclude flood damage."
        }
        (RiskFactor::LimitedReserves, _) => {
            "Build cash reserves toward at least three months of operating expenses, \
             and pre-qualify for an emergency line of credit."
        }
        (RiskFactor::SingleSourceSupply, EntityType::Agriculture) => {
            "Line up a second source for feed, seed and fuel outside your county's \
             primary flood zones."
        }
        (RiskFactor::SingleSourceSupply, EntityType::SmallBusiness) => {
            "Identify at least one backup supplier for each critical input and keep \
             their contact details in your emergency plan."
        }
        (RiskFactor::NoEmergencyPlan, _) => {
            "Write down an emergency plan with contacts, evacuation routes and \
             document backups, and share it with everyone who works with you."
        }
        (RiskFactor::RepeatedDisasters, _) => {
            "Repeated disaster impacts may qualify you for hazard mitigation funding; \
             document past losses and ask NC Emergency Management about mitigation grants."
        }
    }
}

/// Score adjustments keyed by area. Areas whose answers are missing or
/// neutral are left out.
#[must_use]
pub fn score_modifiers(responses: &Responses) -> BTreeMap<String, i32> {
    let mut modifiers = BTreeMap::new();
    let mut set = |area: &str, delta: i32| {
        if delta != 0 {
            modifiers.insert(area.to_string(), delta);
        }
    };

    if let Some(level) = number(responses, fields::PREPAREDNESS_LEVEL) {
        set(
            "preparedness",
            if level >= 70.0 {
                10
            } else if level < LOW_PREPAREDNESS_THRESHOLD {
                -10
            } else {
                0
            },
        );
    }

    set(
        "insurance",
        if checklist_len(responses, fields::INSURANCE_COVERAGE) >= MIN_INSURANCE_PRODUCTS {
            5
        } else {
            -5
        },
    );

    if let Some(months) = number(responses, fields::CASH_RESERVE_MONTHS) {
        set(
            "financial",
            if months >= 6.0 {
                5
            } else if months < MIN_CASH_RESERVE_MONTHS {
                -5
            } else {
                0
            },
        );
    }

    if let Some(count) = number(responses, fields::SUPPLIER_COUNT) {
        set(
            "supply_chain",
            if count >= 3.0 {
                3
            } else if count <= 1.0 {
                -5
            } else {
                0
            },
        );
    }

    if let Some(has_plan) = responses
        .get(fields::HAS_EMERGENCY_PLAN)
        .and_then(Answer::as_bool)
    {
        set("planning", if has_plan { 3 } else { -3 });
    }

    if checklist_len(responses, fields::PAST_DISASTERS) >= 2 {
        set("history", -5);
    }

    modifiers
}

/// Applies `modifiers` to `base`, rounded and clamped to 0-100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn adjusted_score(base: f64, modifiers: &BTreeMap<String, i32>) -> u8 {
    let delta: i32 = modifiers.values().sum();
    (base.round() + f64::from(delta)).clamp(0.0, 100.0) as u8
}

/// Runs every derivation over `responses`.
#[must_use]
pub fn assess(
    responses: &Responses,
    entity_type: EntityType,
    base_score: Option<f64>,
) -> WizardAssessment {
    let base_score = base_score
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_BASE_SCORE);
    let risk_factors = generate_risk_factors(responses);
    let recommendations = generate_recommendations(&risk_factors, entity_type);
    let score_modifiers = score_modifiers(responses);
    let adjusted_score = adjusted_score(base_score, &score_modifiers);

    log::debug!(
        "Assessment for {entity_type}: {} risk factors, adjusted score {adjusted_score}",
        risk_factors.len()
    );

    WizardAssessment {
        entity_type,
        responses: responses.clone(),
        risk_factors,
        recommendations,
        score_modifiers,
        base_score,
        adjusted_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(pairs: &[(&str, Answer)]) -> Responses {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn list(items: &[&str]) -> Answer {
        Answer::Checklist(items.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn low_preparedness_and_thin_insurance() {
        let r = responses(&[
            (fields::PREPAREDNESS_LEVEL, Answer::Number(20.0)),
            (fields::INSURANCE_COVERAGE, list(&["Property"])),
        ]);
        let factors = generate_risk_factors(&r);
        assert!(factors.contains(&RiskFactor::LowPreparedness));
        assert!(factors.contains(&RiskFactor::InsufficientInsurance));
        assert_eq!(
            RiskFactor::LowPreparedness.to_string(),
            "Low disaster preparedness"
        );
        assert_eq!(
            RiskFactor::InsufficientInsurance.to_string(),
            "Insufficient insurance coverage"
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let r = responses(&[
            (fields::PREPAREDNESS_LEVEL, Answer::Number(30.0)),
            (
                fields::INSURANCE_COVERAGE,
                list(&["Property", "Crop", "Flood"]),
            ),
            (fields::CASH_RESERVE_MONTHS, Answer::Number(3.0)),
            (fields::SUPPLIER_COUNT, Answer::Number(2.0)),
            (fields::HAS_EMERGENCY_PLAN, Answer::YesNo(true)),
            (fields::PAST_DISASTERS, list(&["Hurricane"])),
        ]);
        assert!(generate_risk_factors(&r).is_empty());
    }

    #[test]
    fn missing_insurance_counts_as_none() {
        let factors = generate_risk_factors(&Responses::new());
        assert_eq!(factors, vec![RiskFactor::InsufficientInsurance]);
    }

    #[test]
    fn risk_factors_serialize_as_labels() {
        let json = serde_json::to_string(&vec![RiskFactor::NoEmergencyPlan]).unwrap();
        assert_eq!(json, "[\"No written emergency plan\"]");
    }

    #[test]
    fn recommendations_follow_factors() {
        let factors = vec![RiskFactor::LowPreparedness, RiskFactor::LimitedReserves];
        let ag = generate_recommendations(&factors, EntityType::Agriculture);
        let sb = generate_recommendations(&factors, EntityType::SmallBusiness);
        assert_eq!(ag.len(), 2);
        assert!(ag[0].contains("Cooperative Extension"));
        assert!(sb[0].contains("SBA"));
        assert_eq!(ag[1], sb[1]);
        assert_eq!(generate_recommendations(&[], EntityType::Agriculture).len(), 1);
    }

    #[test]
    fn modifiers_and_adjusted_score() {
        let r = responses(&[
            (fields::PREPAREDNESS_LEVEL, Answer::Number(80.0)),
            (
                fields::INSURANCE_COVERAGE,
                list(&["Property", "Crop", "Flood"]),
            ),
            (fields::CASH_RESERVE_MONTHS, Answer::Number(4.0)),
            (fields::SUPPLIER_COUNT, Answer::Number(1.0)),
            (fields::HAS_EMERGENCY_PLAN, Answer::YesNo(true)),
        ]);
        let modifiers = score_modifiers(&r);
        assert_eq!(modifiers.get("preparedness"), Some(&10));
        assert_eq!(modifiers.get("insurance"), Some(&5));
        assert_eq!(modifiers.get("financial"), None);
        assert_eq!(modifiers.get("supply_chain"), Some(&-5));
        assert_eq!(modifiers.get("planning"), Some(&3));
        assert_eq!(adjusted_score(DEFAULT_BASE_SCORE, &modifiers), 78);
    }

    #[test]
    fn adjusted_score_clamps() {
        let mut modifiers = BTreeMap::new();
        modifiers.insert("preparedness".to_string(), -10);
        assert_eq!(adjusted_score(4.0, &modifiers), 0);
        modifiers.insert("preparedness".to_string(), 10);
        assert_eq!(adjusted_score(98.0, &modifiers), 100);
    }

    #[test]
    fn assess_uses_real_base_when_given() {
        let r = responses(&[(fields::PREPAREDNESS_LEVEL, Answer::Number(50.0))]);
        let default_base = assess(&r, EntityType::SmallBusiness, None);
        assert!((default_base.base_score - DEFAULT_BASE_SCORE).abs() < f64::EPSILON);
        assert_eq!(default_base.adjusted_score, 60);
        let real_base = assess(&r, EntityType::SmallBusiness, Some(71.6));
        assert_eq!(real_base.adjusted_score, 67);
        let nan_base = assess(&r, EntityType::SmallBusiness, Some(f64::NAN));
        assert!((nan_base.base_score - DEFAULT_BASE_SCORE).abs() < f64::EPSILON);
    }
}
