// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnswerEvaluation, CandidateProfile, ChatMessage, JobPosting, OpportunityRecord, Provenance,
    PublicQuizQuestion, QuizQuestion, QuizScore, ResumeAnalysis, ScoredOpportunity, ScoringWeights,
};
pub use requests::{
    AnalyzePdfQuery, AnalyzeResumeRequest, ChatRequest, EvaluateAnswerRequest,
    InterviewQuestionsRequest, LiveJobsQuery, NewApplicationRequest, ProfileDetails,
    QuizSubmission, RecommendRequest, SaveProfileRequest,
};
pub use responses::{
    CatalogResponse, ChatResponse, ErrorResponse, HealthResponse, LiveJobsResponse,
    QuestionsResponse, QuizResponse, Recommendation, RecommendResponse, ReloadResponse,
    SectorsResponse,
};
