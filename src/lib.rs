//! Internship Match - recommendation and career-services API
//!
//! The core of this crate is the [`Matcher`], which ranks a catalog of
//! internship opportunities against a candidate profile using a weighted
//! five-factor score. Around it sit the HTTP layer and the supporting career
//! services: live postings, resume scoring, interview prep, quizzes and
//! per-user tracking.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, Matcher};
pub use models::{
    CandidateProfile, OpportunityRecord, RecommendRequest, RecommendResponse, ScoredOpportunity,
    ScoringWeights,
};
pub use routes::{configure_routes, AppState};
