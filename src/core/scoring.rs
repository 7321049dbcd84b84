use crate::models::{CandidateProfile, OpportunityRecord, ScoringWeights};
use std::collections::HashSet;

/// Sentinel meaning the opportunity accepts any education level
const ANY_EDUCATION: &str = "any";

/// Skills factor when the opportunity lists no required skills
const NEUTRAL_SKILLS: f64 = 0.5;
/// Interest factor when the candidate gave no interests
const NEUTRAL_INTEREST: f64 = 0.3;
/// Location factor when nothing about the locations lines up
const DEFAULT_LOCATION: f64 = 0.4;

/// Per-factor breakdown of a match, each value in 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub education: f64,
    pub skills: f64,
    pub interest: f64,
    pub location: f64,
    pub experience: f64,
}

impl FactorScores {
    /// Compute all five factors for one catalog entry
    pub fn compute(profile: &CandidateProfile, opportunity: &OpportunityRecord) -> Self {
        Self {
            education: education_factor(&profile.education, &opportunity.required_education),
            skills: skills_factor(&profile.skills, &opportunity.required_skills),
            interest: interest_factor(&profile.interests, &opportunity.sector),
            location: location_factor(
                &profile.location,
                &opportunity.location,
                opportunity.remote_available,
            ),
            experience: experience_factor(
                profile.previous_experience,
                opportunity.experience_required,
            ),
        }
    }

    /// Weighted mean of the factors, normalized by the total weight (0-1)
    pub fn weighted(&self, weights: &ScoringWeights) -> f64 {
        let total_weight = weights.total();
        if total_weight <= 0.0 {
            return 0.0;
        }

        let sum = self.education * weights.education
            + self.skills * weights.skills
            + self.interest * weights.interest
            + self.location * weights.location
            + self.experience * weights.experience;

        sum / total_weight
    }
}

/// Calculate a match score (0-100, one decimal) for a catalog entry
///
/// Scoring formula:
/// score = (
///     education * 0.25 +     # equal or "any" = 1.0, graduate family = 0.8
///     skills * 0.30 +        # share of required skills the candidate has
///     interest * 0.25 +      # interest vs sector substring match
///     location * 0.15 +      # remote, exact, partial, otherwise 0.4
///     experience * 0.05      # 0.6 only when required and missing
/// ) / total_weight * 100
pub fn calculate_match_score(
    profile: &CandidateProfile,
    opportunity: &OpportunityRecord,
    weights: &ScoringWeights,
) -> f64 {
    let normalized = FactorScores::compute(profile, opportunity).weighted(weights);
    round_one_decimal(normalized * 100.0).clamp(0.0, 100.0)
}

/// Round to one decimal, nearest to the exact binary value
///
/// Formatting rounds the stored double itself, so 69.25 (stored just below)
/// becomes 69.2. Scaling by ten first would round it up.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Education factor (0-1)
#[inline]
pub fn education_factor(candidate: &str, required: &str) -> f64 {
    let candidate = candidate.to_lowercase();
    let required = required.to_lowercase();

    if candidate == required || required == ANY_EDUCATION {
        1.0
    } else if candidate.contains("graduate") && required.contains("graduate") {
        0.8
    } else if candidate.contains("undergraduate") && required.contains("undergraduate") {
        0.8
    } else {
        0.0
    }
}

/// Skills factor (0-1)
/// Share of the distinct required skills the candidate has, case-insensitive
pub fn skills_factor(candidate: &[String], required: &[String]) -> f64 {
    let required: HashSet<String> = required.iter().map(|s| s.to_lowercase()).collect();
    if required.is_empty() {
        return NEUTRAL_SKILLS;
    }

    let candidate: HashSet<String> = candidate.iter().map(|s| s.to_lowercase()).collect();
    let matched = required.intersection(&candidate).count();

    matched as f64 / required.len() as f64
}

/// Interest/sector factor (0-1)
///
/// A full substring match in either direction wins immediately. A word-level
/// hit records 0.6 but the scan goes on in case a later interest fully matches.
pub fn interest_factor(interests: &[String], sector: &str) -> f64 {
    if interests.is_empty() {
        return NEUTRAL_INTEREST;
    }

    let sector = sector.to_lowercase();
    let mut best: f64 = 0.0;

    for interest in interests {
        let interest = interest.to_lowercase();
        if sector.contains(&interest) || interest.contains(&sector) {
            return 1.0;
        }
        if interest.split_whitespace().any(|word| sector.contains(word)) {
            best = best.max(0.6);
        }
    }

    best
}

/// Location factor (0-1)
/// Remote availability is checked before the exact-match bonus
pub fn location_factor(candidate: &str, required: &str, remote_available: bool) -> f64 {
    if remote_available {
        return 0.8;
    }

    let candidate = candidate.to_lowercase();
    let required = required.to_lowercase();

    if candidate == required {
        1.0
    } else if candidate
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .any(|word| required.contains(word))
    {
        0.7
    } else {
        DEFAULT_LOCATION
    }
}

/// Experience factor (0-1)
#[inline]
pub fn experience_factor(has_experience: bool, experience_required: bool) -> f64 {
    if !experience_required || has_experience == experience_required {
        1.0
    } else {
        0.6
    }
}
