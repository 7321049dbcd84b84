// Service exports
pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod completion;
pub mod live_jobs;
pub mod postgres;
pub mod quiz;
pub mod resume;

pub use assistant::CareerAssistant;
pub use auth::{AuthError, TokenVerifier};
pub use catalog::{Catalog, CatalogError, CatalogStore, Recommender};
pub use completion::{ChatCompletionClient, CompletionError, CompletionOptions, CompletionService};
pub use live_jobs::{build_search_query, CachedJobSource, HttpJobSource, JobSource, LiveJobsError};
pub use postgres::{Application, DashboardStats, PostgresClient, PostgresError, StoredProfile, User};
pub use quiz::QuizBank;
pub use resume::{extract_pdf_text, ResumeError};
