// 🧭 Street Resolver - Candidate name → registry street
//
// Tiers are tried in order and the first hit wins:
//   1. exact name
//   2. slug equality
//   3. embankment abbreviation ("nábř." → "nábřeží")
// Locale-specific heuristics are extra tiers, the first two stay untouched.

use crate::model::{ResolutionOutcome, Street};
use crate::registry::Registry;
use crate::slug::slugify;

// ============================================================================
// MATCH TIERS
// ============================================================================

/// Predicate over registry streets, built once per candidate
pub type StreetMatcher<'c> = Box<dyn Fn(&Street) -> bool + 'c>;

pub trait MatchTier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn matcher<'c>(&self, candidate: &'c str) -> StreetMatcher<'c>;
}

/// Byte-for-byte name equality
pub struct ExactName;

impl MatchTier for ExactName {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matcher<'c>(&self, candidate: &'c str) -> StreetMatcher<'c> {
        Box::new(move |s: &Street| s.name == candidate)
    }
}

/// Case, diacritics and period insensitive comparison
pub struct SlugMatch;

impl MatchTier for SlugMatch {
    fn name(&self) -> &'static str {
        "slug"
    }

    fn matcher<'c>(&self, candidate: &'c str) -> StreetMatcher<'c> {
        let slug = slugify(candidate);
        Box::new(move |s: &Street| s.slug == slug)
    }
}

/// Czech embankment abbreviation: the slug of "nábř." plus "ezi" is "nabrezi"
pub struct EmbankmentSuffix;

const EMBANKMENT_SUFFIX: &str = "ezi";

impl MatchTier for EmbankmentSuffix {
    fn name(&self) -> &'static str {
        "embankment"
    }

    fn matcher<'c>(&self, candidate: &'c str) -> StreetMatcher<'c> {
        let slug = format!("{}{}", slugify(candidate), EMBANKMENT_SUFFIX);
        Box::new(move |s: &Street| s.slug == slug)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

pub struct StreetResolver {
    tiers: Vec<Box<dyn MatchTier>>,
}

impl StreetResolver {
    pub fn new() -> Self {
        StreetResolver {
            tiers: vec![
                Box::new(ExactName),
                Box::new(SlugMatch),
                Box::new(EmbankmentSuffix),
            ],
        }
    }

    /// Append a tier after the existing ones
    pub fn with_tier(mut self, tier: Box<dyn MatchTier>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Look `candidate` up among the streets of `city_code`
    pub fn suggest_street(
        &self,
        registry: &dyn Registry,
        city_code: u32,
        candidate: &str,
    ) -> ResolutionOutcome {
        for tier in &self.tiers {
            let accept = tier.matcher(candidate);
            if let Some(street) = registry.find_street(city_code, accept.as_ref()) {
                tracing::debug!(tier = tier.name(), candidate, street = %street, "street resolved");
                return if street.name == candidate {
                    ResolutionOutcome::ExactMatch(street)
                } else {
                    ResolutionOutcome::CorrectedMatch(street)
                };
            }
        }

        tracing::debug!(city_code, candidate, "street not found");
        ResolutionOutcome::NotFound
    }
}

impl Default for StreetResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
