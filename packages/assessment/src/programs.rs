//! Compile-time registry of disaster assistance programs.
//!
//! Programs are defined in TOML files under `programs/`, one file per
//! jurisdiction. [`match_programs`] filters the registry by sector, state
//! and the county's top hazards.

use std::sync::LazyLock;

use nc_resilience_county_models::fips::state_name;
use nc_resilience_county_models::{CountyFips, EntityType, HazardType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coverage area of programs with no state restriction.
pub const NATIONWIDE: &str = "Nationwide";

/// The form of assistance a program offers.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProgramKind {
    Grant,
    Loan,
    Insurance,
    CostShare,
    TechnicalAssistance,
}

/// An assistance program loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceProgram {
    /// Unique identifier (e.g., `"sba-eidl"`).
    pub id: String,
    /// Program name.
    pub name: String,
    /// Administering agency.
    pub agency: String,
    /// One-sentence summary.
    pub description: String,
    /// Program page.
    pub url: String,
    /// Form of assistance.
    pub kind: ProgramKind,
    /// Sectors the program serves.
    #[serde(alias = "entity_types")]
    pub entity_types: Vec<EntityType>,
    /// Hazards the program covers. Empty means any hazard.
    #[serde(default)]
    pub hazards: Vec<HazardType>,
    /// Restricts the program to one state. `None` means nationwide.
    #[serde(default, alias = "state_fips", skip_serializing_if = "Option::is_none")]
    pub state_fips: Option<String>,
}

impl AssistanceProgram {
    /// Whether the program serves `entity_type`.
    #[must_use]
    pub fn serves(&self, entity_type: EntityType) -> bool {
        self.entity_types.contains(&entity_type)
    }

    /// Whether the program is offered in `county`. Nationwide programs are
    /// offered everywhere, and with no county only they are offered.
    #[must_use]
    pub fn offered_in(&self, county: Option<&CountyFips>) -> bool {
        match (&self.state_fips, county) {
            (None, _) => true,
            (Some(state), Some(county)) => county.state_fips() == state,
            (Some(_), None) => false,
        }
    }

    /// Where the program is offered: the state's name for state programs,
    /// [`NATIONWIDE`] otherwise.
    #[must_use]
    pub fn coverage_area(&self) -> &str {
        match &self.state_fips {
            None => NATIONWIDE,
            Some(state) => state_name(state).unwrap_or(state),
        }
    }

    /// The subset of `hazards` this program covers.
    #[must_use]
    pub fn covered_hazards(&self, hazards: &[HazardType]) -> Vec<HazardType> {
        hazards
            .iter()
            .copied()
            .filter(|h| self.hazards.contains(h))
            .collect()
    }
}

/// A program that applies to a county, with the hazards it matched on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramMatch {
    pub program: AssistanceProgram,
    /// State name or [`NATIONWIDE`].
    #[serde(default)]
    pub coverage_area: String,
    /// County hazards named by the program. Empty for any-hazard programs.
    pub matched_hazards: Vec<HazardType>,
}

#[derive(Deserialize)]
struct ProgramFile {
    programs: Vec<AssistanceProgram>,
}

// ── Compile-time embedded TOML files ────────────────────────────────

const PROGRAM_TOMLS: &[(&str, &str)] = &[
    ("federal", include_str!("../programs/federal.toml")),
    ("north_carolina", include_str!("../programs/north_carolina.toml")),
];

#[cfg(test)]
const EXPECTED_PROGRAM_COUNT: usize = 13;

static PROGRAMS: LazyLock<Vec<AssistanceProgram>> = LazyLock::new(|| {
    PROGRAM_TOMLS
        .iter()
        .flat_map(|(name, toml_str)| {
            toml::de::from_str::<ProgramFile>(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse program file '{name}': {e}"))
                .programs
        })
        .collect()
});

/// Returns every assistance program in the registry.
///
/// # Panics
///
/// Panics if any embedded program file is malformed.
#[must_use]
pub fn all_programs() -> &'static [AssistanceProgram] {
    &PROGRAMS
}

/// Finds the programs that apply to `entity_type` in `county`, given the
/// county's top `hazards`.
///
/// Hazard-specific programs must cover at least one of `hazards`; when
/// `hazards` is empty the hazard filter is skipped. Results are ranked by
/// the number of matched hazards, then by name.
#[must_use]
pub fn match_programs(
    entity_type: EntityType,
    county: Option<&CountyFips>,
    hazards: &[HazardType],
) -> Vec<ProgramMatch> {
    let mut matches: Vec<ProgramMatch> = all_programs()
        .iter()
        .filter(|p| p.serves(entity_type) && p.offered_in(county))
        .filter_map(|p| {
            let matched_hazards = p.covered_hazards(hazards);
            let applies = p.hazards.is_empty() || hazards.is_empty() || !matched_hazards.is_empty();
            applies.then(|| ProgramMatch {
                program: p.clone(),
                coverage_area: p.coverage_area().to_string(),
                matched_hazards,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.matched_hazards
            .len()
            .cmp(&a.matched_hazards.len())
            .then_with(|| a.program.name.cmp(&b.program.name))
    });

    log::debug!(
        "Matched {} programs for {entity_type} (county={:?}, hazards={hazards:?})",
        matches.len(),
        county.map(CountyFips::as_str),
    );

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn wake() -> CountyFips {
        CountyFips::new("37183").unwrap()
    }

    #[test]
    fn loads_all_programs() {
        assert_eq!(all_programs().len(), EXPECTED_PROGRAM_COUNT);
    }

    #[test]
    fn program_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for program in all_programs() {
            assert!(
                seen.insert(&program.id),
                "Duplicate program ID: {}",
                program.id
            );
        }
    }

    #[test]
    fn all_programs_have_required_fields() {
        for program in all_programs() {
            assert!(!program.name.is_empty(), "Program {} has empty name", program.id);
            assert!(!program.agency.is_empty(), "Program {} has empty agency", program.id);
            assert!(program.url.starts_with("https://"), "Program {} url", program.id);
            assert!(
                !program.entity_types.is_empty(),
                "Program {} serves no sector",
                program.id
            );
            assert!(
                !program.hazards.contains(&HazardType::Other),
                "Program {} has an unknown hazard code",
                program.id
            );
        }
    }

    #[test]
    fn state_programs_need_a_matching_county() {
        let tennessee = CountyFips::new("47037").unwrap();
        let in_nc = match_programs(EntityType::SmallBusiness, Some(&wake()), &[]);
        let in_tn = match_programs(EntityType::SmallBusiness, Some(&tennessee), &[]);
        let nowhere = match_programs(EntityType::SmallBusiness, None, &[]);
        assert!(in_nc.iter().any(|m| m.program.id == "nc-sbtdc"));
        assert!(!in_tn.iter().any(|m| m.program.id == "nc-sbtdc"));
        assert_eq!(in_tn.len(), nowhere.len());
    }

    #[test]
    fn matches_name_their_coverage_area() {
        let matches = match_programs(EntityType::SmallBusiness, Some(&wake()), &[]);
        let area = |id: &str| {
            matches
                .iter()
                .find(|m| m.program.id == id)
                .map(|m| m.coverage_area.as_str())
        };
        assert_eq!(area("nc-sbtdc"), Some("North Carolina"));
        assert_eq!(area("sba-eidl"), Some(NATIONWIDE));
    }

    #[test]
    fn sector_filter_applies() {
        for m in match_programs(EntityType::Agriculture, Some(&wake()), &[]) {
            assert!(m.program.serves(EntityType::Agriculture));
        }
        assert!(
            !match_programs(EntityType::Agriculture, Some(&wake()), &[])
                .iter()
                .any(|m| m.program.id == "sba-physical-disaster-loans")
        );
    }

    #[test]
    fn hazard_specific_programs_need_a_match() {
        let drought_only =
            match_programs(EntityType::Agriculture, Some(&wake()), &[HazardType::Drought]);
        assert!(drought_only.iter().any(|m| m.program.id == "usda-elap"));
        assert!(!drought_only.iter().any(|m| m.program.id == "nfip"));
        assert!(drought_only.iter().any(|m| m.program.id == "rma-crop-insurance"));
    }

    #[test]
    fn ranked_by_matched_hazards_then_name() {
        let hazards = [HazardType::Hurricane, HazardType::RiverineFlooding];
        let matches = match_programs(EntityType::Agriculture, Some(&wake()), &hazards);
        for pair in matches.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.matched_hazards.len() > b.matched_hazards.len()
                    || (a.matched_hazards.len() == b.matched_hazards.len()
                        && a.program.name <= b.program.name)
            );
        }
        assert_eq!(matches[0].matched_hazards.len(), 2);
    }
}
