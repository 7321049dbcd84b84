use crate::models::domain::{
    CandidateProfile, JobPosting, OpportunityRecord, Provenance, PublicQuizQuestion,
    ScoredOpportunity,
};
use serde::{Deserialize, Serialize};

/// One entry in a recommendation list
///
/// Catalog entries carry a matcher score; live postings carry the constant the
/// request layer assigns to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub opportunity: OpportunityRecord,
    #[serde(alias = "matchScore")]
    pub match_score: f64,
    pub provenance: Provenance,
}

impl From<ScoredOpportunity> for Recommendation {
    fn from(scored: ScoredOpportunity) -> Self {
        Self {
            opportunity: scored.opportunity,
            match_score: scored.match_score,
            provenance: Provenance::Catalog,
        }
    }
}

impl Recommendation {
    /// Wrap a live posting, shaped like a catalog entry
    pub fn live(posting: JobPosting, skills: &[String], assigned_score: f64) -> Self {
        let opportunity = OpportunityRecord {
            id: format!("live_{}", posting.id),
            title: posting.title,
            organization: posting.company,
            sector: "Live Recruitment".to_string(),
            location: posting.location,
            required_skills: skills.iter().take(3).cloned().collect(),
            duration: Some("Flexible".to_string()),
            stipend: Some("Disclosed on Apply".to_string()),
            description: Some("Real-time opportunity sourced from live job networks.".to_string()),
            link: Some(posting.apply_url),
            ..Default::default()
        };

        Self {
            opportunity,
            match_score: assigned_score,
            provenance: Provenance::Live,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
    pub profile: CandidateProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorsResponse {
    pub sectors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub internships: Vec<OpportunityRecord>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveJobsResponse {
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub subject: String,
    pub questions: Vec<PublicQuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
    pub database: Option<bool>,
    /// Whether a completion service backs the assistant
    pub assistant_online: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_recommendation_is_tagged() {
        let posting = JobPosting {
            id: "42".to_string(),
            title: "Data Intern".to_string(),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            apply_url: "https://jobs.example/42".to_string(),
            source: "Live Web".to_string(),
            posted_at: None,
        };
        let skills = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];

        let rec = Recommendation::live(posting, &skills, 95.0);

        assert_eq!(rec.provenance, Provenance::Live);
        assert_eq!(rec.opportunity.id, "live_42");
        assert_eq!(rec.opportunity.sector, "Live Recruitment");
        assert_eq!(rec.opportunity.required_skills.len(), 3);
        assert_eq!(rec.match_score, 95.0);

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["provenance"], "live");
        assert_eq!(value["organization"], "Acme");
    }
}
