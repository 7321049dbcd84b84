use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Candidate profile submitted with a recommendation request
///
/// Every field is optional on the wire. Absent fields take the empty value and
/// the scorer treats them as "no preference".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "previousExperience", alias = "previous_experience", default)]
    pub previous_experience: bool,
}

/// Catalog entry describing one internship opportunity
///
/// Descriptive fields the matcher does not read are kept in `extra` and
/// serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub sector: String,
    #[serde(rename = "required_education", alias = "requiredEducation", default)]
    pub required_education: String,
    #[serde(rename = "required_skills", alias = "requiredSkills", default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "remote_available", alias = "remoteAvailable", default)]
    pub remote_available: bool,
    #[serde(rename = "experience_required", alias = "experienceRequired", default)]
    pub experience_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stipend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Catalog ids are strings in our data, but older exports used integers
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Matcher output: a catalog entry plus its score
///
/// Built fresh for every ranking pass. The catalog entry itself is never
/// modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOpportunity {
    #[serde(flatten)]
    pub opportunity: OpportunityRecord,
    #[serde(alias = "matchScore")]
    pub match_score: f64,
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Catalog,
    Live,
}

/// A posting returned by the live job source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "applyUrl", alias = "apply_url")]
    pub apply_url: String,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "postedAt", alias = "posted_at", default)]
    pub posted_at: Option<String>,
}

/// Factor weights for the match score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub education: f64,
    pub skills: f64,
    pub interest: f64,
    pub location: f64,
    pub experience: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.education + self.skills + self.interest + self.location + self.experience
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            education: 0.25,
            skills: 0.30,
            interest: 0.25,
            location: 0.15,
            experience: 0.05,
        }
    }
}

/// One question from the quiz bank, including its answer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
}

/// Quiz question as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
}

impl From<&QuizQuestion> for PublicQuizQuestion {
    fn from(q: &QuizQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            options: q.options.clone(),
        }
    }
}

/// Result of grading a quiz submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizScore {
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
}

/// Keyword or AI analysis of a resume against a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub score: f64,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub verdict: String,
    #[serde(default)]
    pub summary: String,
}

/// Score and feedback for an interview answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub score: u32,
    pub feedback: String,
}

/// A single turn in a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunity_keeps_unknown_fields() {
        let json = r#"{
            "id": 7,
            "title": "Data Intern",
            "sector": "Data Analytics",
            "required_skills": ["python"],
            "topics": ["pandas"]
        }"#;

        let record: OpportunityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "7");
        assert_eq!(record.required_education, "");
        assert!(!record.remote_available);
        assert_eq!(record.extra.get("topics"), Some(&serde_json::json!(["pandas"])));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["topics"], serde_json::json!(["pandas"]));
    }

    #[test]
    fn test_profile_defaults_when_fields_missing() {
        let profile: CandidateProfile = serde_json::from_str(r#"{"skills": ["SQL"]}"#).unwrap();
        assert_eq!(profile.education, "");
        assert!(profile.interests.is_empty());
        assert!(!profile.previous_experience);
    }

    #[test]
    fn test_scored_opportunity_flattens_record() {
        let scored = ScoredOpportunity {
            opportunity: OpportunityRecord {
                id: "a".to_string(),
                ..Default::default()
            },
            match_score: 42.5,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["match_score"], 42.5);
        assert!(value.get("matchScore").is_none());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().total() - 1.0).abs() < 1e-9);
    }
}
