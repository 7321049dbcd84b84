use crate::core::scoring::calculate_match_score;
use crate::models::{CandidateProfile, OpportunityRecord, ScoredOpportunity, ScoringWeights};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Sector label used for catalog entries without one
const UNKNOWN_SECTOR: &str = "Other";

/// Ranks catalog entries against a candidate profile
///
/// Stateless apart from its weights: the same profile and catalog always
/// produce the same ranking.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Score every entry and return the `top_n` best
    ///
    /// The sort is stable, so entries with equal scores keep their catalog
    /// order. The catalog is only read; each result is a new value.
    pub fn rank(
        &self,
        profile: &CandidateProfile,
        catalog: &[OpportunityRecord],
        top_n: usize,
    ) -> Vec<ScoredOpportunity> {
        let mut scored: Vec<ScoredOpportunity> = catalog
            .iter()
            .map(|opportunity| ScoredOpportunity {
                match_score: calculate_match_score(profile, opportunity, &self.weights),
                opportunity: opportunity.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });

        scored.truncate(top_n);
        scored
    }

    /// Distinct sectors present in the catalog, sorted
    pub fn available_sectors(catalog: &[OpportunityRecord]) -> Vec<String> {
        catalog
            .iter()
            .map(|opportunity| {
                if opportunity.sector.is_empty() {
                    UNKNOWN_SECTOR.to_string()
                } else {
                    opportunity.sector.clone()
                }
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
