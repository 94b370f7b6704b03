//! Score bucketing policies.
//!
//! The map, the score card and the hazard list each band the same 0-100
//! scale differently. Every call site goes through one [`BucketingPolicy`]
//! type; the threshold tables live in TOML files under `policies/`, embedded
//! at compile time and parsed once.

use std::sync::LazyLock;

use nc_resilience_scoring_models::{Bucket, BucketContext, ColorToken};
use serde::Deserialize;

/// How tier bounds are compared against a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// A score falls in the first tier with `score >= bound`.
    AtLeast,
    /// A score falls in the first tier with `score <= bound`.
    AtMost,
}

/// One labelled band of a policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tier {
    /// Tier label shown to the user.
    pub label: String,
    /// Color token for the tier.
    pub color: ColorToken,
    /// Threshold compared according to the policy [`Direction`].
    pub bound: f64,
}

/// The tier used when no bounded tier matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FallbackTier {
    /// Tier label shown to the user.
    pub label: String,
    /// Color token for the tier.
    pub color: ColorToken,
}

/// A threshold table for one [`BucketContext`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BucketingPolicy {
    /// Call site this policy applies to.
    pub context: BucketContext,
    /// Comparison direction for `tiers`.
    pub direction: Direction,
    /// Bounded tiers, checked in order.
    pub tiers: Vec<Tier>,
    /// Tier for scores that match no bounded tier.
    pub fallback: FallbackTier,
}

impl BucketingPolicy {
    /// Buckets `score`. `None` and NaN map to the neutral no-data bucket.
    #[must_use]
    pub fn classify(&self, score: Option<f64>) -> Bucket {
        let Some(score) = score.filter(|s| !s.is_nan()) else {
            return Bucket::no_data();
        };

        let matched = self.tiers.iter().find(|tier| match self.direction {
            Direction::AtLeast => score >= tier.bound,
            Direction::AtMost => score <= tier.bound,
        });

        match matched {
            Some(tier) => Bucket {
                tier: Some(tier.label.clone()),
                color: tier.color,
            },
            None => Bucket {
                tier: Some(self.fallback.label.clone()),
                color: self.fallback.color,
            },
        }
    }

    /// Labels of every tier in order, fallback last. Used for legends.
    #[must_use]
    pub fn legend(&self) -> Vec<(&str, ColorToken)> {
        self.tiers
            .iter()
            .map(|t| (t.label.as_str(), t.color))
            .chain(std::iter::once((
                self.fallback.label.as_str(),
                self.fallback.color,
            )))
            .collect()
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const POLICY_TOMLS: &[(&str, &str)] = &[
    ("map", include_str!("../policies/map.toml")),
    ("card_risk", include_str!("../policies/card_risk.toml")),
    (
        "card_resilience",
        include_str!("../policies/card_resilience.toml"),
    ),
    ("hazard_list", include_str!("../policies/hazard_list.toml")),
];

static POLICIES: LazyLock<Vec<BucketingPolicy>> = LazyLock::new(|| {
    POLICY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse bucketing policy '{name}': {e}"))
        })
        .collect()
});

/// Returns every bucketing policy.
///
/// # Panics
///
/// Panics if an embedded policy file is malformed.
#[must_use]
pub fn all_policies() -> &'static [BucketingPolicy] {
    &POLICIES
}

/// Returns the policy for `context`.
///
/// # Panics
///
/// Panics if no embedded policy is registered for `context`.
#[must_use]
pub fn policy(context: BucketContext) -> &'static BucketingPolicy {
    all_policies()
        .iter()
        .find(|p| p.context == context)
        .unwrap_or_else(|| panic!("No bucketing policy registered for {context}"))
}

/// Buckets `score` with the policy for `context`.
#[must_use]
pub fn bucket(context: BucketContext, score: Option<f64>) -> Bucket {
    policy(context).classify(score)
}
