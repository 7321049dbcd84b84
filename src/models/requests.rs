use crate::models::domain::{CandidateProfile, ChatMessage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Request to rank the catalog against a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    #[validate(range(min = 0, message = "topN must not be negative"))]
    #[serde(rename = "topN", alias = "top_n", default)]
    pub top_n: Option<i64>,
}

/// Query parameters for the live postings endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveJobsQuery {
    pub query: Option<String>,
    pub location: Option<String>,
}

/// Resume text to score against a job description
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeResumeRequest {
    #[validate(length(min = 1, message = "resume text is required"))]
    #[serde(rename = "resumeText", alias = "resume_text")]
    pub resume_text: String,
    #[serde(rename = "jobDescription", alias = "job_description", default)]
    pub job_description: String,
}

/// Query parameters accompanying an uploaded PDF resume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePdfQuery {
    #[serde(rename = "jobDescription", alias = "job_description", default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestionsRequest {
    #[serde(default = "default_general")]
    pub role: String,
    #[serde(default = "default_general")]
    pub topic: String,
}

fn default_general() -> String {
    "General".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateAnswerRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Quiz submission: question id -> selected option index
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizSubmission {
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,
    #[serde(default)]
    pub answers: HashMap<String, i64>,
}

/// New entry for the application tracker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewApplicationRequest {
    #[validate(length(min = 1, message = "company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Profile save request; the matcher fields plus free-form detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProfileRequest {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

/// Optional descriptive profile fields persisted alongside the matcher fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetails {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub academic_score: Option<String>,
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub projects_json: Option<String>,
    #[serde(default)]
    pub work_history_json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_request_rejects_negative_top_n() {
        let req: RecommendRequest =
            serde_json::from_str(r#"{"skills": ["python"], "topN": -1}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_recommend_request_without_top_n() {
        let req: RecommendRequest = serde_json::from_str(r#"{"education": "graduate"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.top_n, None);
        assert_eq!(req.profile.education, "graduate");
    }
}
