//! Crisis-mode emergency contacts and checklists.
//!
//! Each guide is a TOML file under `crisis/`. A guide with no hazards is
//! general and is shown for every hazard.

use std::sync::LazyLock;

use nc_resilience_county_models::HazardType;
use serde::{Deserialize, Serialize};

/// Someone to call or a page to visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
}

/// Emergency guidance for a group of hazards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisGuide {
    /// Hazards this guide covers. Empty means general guidance.
    #[serde(default)]
    pub hazards: Vec<HazardType>,
    pub title: String,
    pub summary: String,
    /// Steps in the order they should be taken.
    pub checklist: Vec<String>,
    pub contacts: Vec<Contact>,
}

impl CrisisGuide {
    /// Whether this guide applies to every hazard.
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.hazards.is_empty()
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const GUIDE_TOMLS: &[(&str, &str)] = &[
    ("general", include_str!("../crisis/general.toml")),
    ("flooding", include_str!("../crisis/flooding.toml")),
    ("drought_heat", include_str!("../crisis/drought_heat.toml")),
    ("storms", include_str!("../crisis/storms.toml")),
];

static GUIDES: LazyLock<Vec<CrisisGuide>> = LazyLock::new(|| {
    GUIDE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse crisis guide '{name}': {e}"))
        })
        .collect()
});

/// Returns every crisis guide, general guides first.
///
/// # Panics
///
/// Panics if any embedded guide is malformed.
#[must_use]
pub fn all_guides() -> &'static [CrisisGuide] {
    &GUIDES
}

/// The guides to show for `hazard`: general guides, then the guides
/// covering `hazard`. With no hazard only the general guides are returned.
#[must_use]
pub fn crisis_resources(hazard: Option<HazardType>) -> Vec<&'static CrisisGuide> {
    let (general, specific): (Vec<_>, Vec<_>) =
        all_guides().iter().partition(|g| g.is_general());

    general
        .into_iter()
        .chain(
            specific
                .into_iter()
                .filter(|g| hazard.is_some_and(|h| g.hazards.contains(&h))),
        )
        .collect()
}
