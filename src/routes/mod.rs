// Route exports
pub mod auth;
pub mod career;
pub mod recommend;

use crate::config::Settings;
use crate::models::ErrorResponse;
use crate::services::{
    CareerAssistant, JobSource, PostgresClient, PostgresError, QuizBank, Recommender, TokenVerifier,
};
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use thiserror::Error;

pub use auth::{AuthUser, MaybeAuthUser};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub assistant: CareerAssistant,
    pub quiz: Arc<QuizBank>,
    /// Live postings; absent when the feed is disabled
    pub jobs: Option<Arc<dyn JobSource>>,
    /// Persistence; absent when no database is configured
    pub postgres: Option<Arc<PostgresClient>>,
    pub tokens: Option<Arc<TokenVerifier>>,
    pub limits: RequestLimits,
}

impl AppState {
    /// The database client, or 503 when running without one
    pub fn db(&self) -> Result<&PostgresClient, ApiError> {
        self.postgres
            .as_deref()
            .ok_or_else(|| ApiError::Unavailable("Database is not configured".to_string()))
    }
}

/// Request-level tunables taken from configuration
#[derive(Debug, Clone)]
pub struct RequestLimits {
    pub default_top_n: usize,
    pub live_limit: usize,
    pub live_max_merged: usize,
    pub live_assigned_score: f64,
    pub live_default_location: String,
}

impl RequestLimits {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_top_n: settings.matching.default_top_n,
            live_limit: settings.live_jobs.limit,
            live_max_merged: settings.live_jobs.max_merged,
            live_assigned_score: settings.live_jobs.assigned_score,
            live_default_location: settings.live_jobs.default_location.clone(),
        }
    }

    /// Resolve a requested result count, using the default when absent
    ///
    /// Only the catalog size bounds the result; negative counts are rejected
    /// by request validation before this point.
    pub fn top_n(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(n) => usize::try_from(n).unwrap_or(0),
            None => self.default_top_n,
        }
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Error returned by handlers and extractors, rendered as `ErrorResponse`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "invalid_argument",
            message: message.into(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } => code,
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::invalid_argument(errors.to_string())
    }
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::NotFound(what) => Self::NotFound(format!("Not found: {}", what)),
            other => {
                tracing::error!("Database error: {}", other);
                Self::Internal("Database error".to_string())
            }
        }
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest {
        code: "invalid_json",
        message: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest {
        code: "invalid_query",
        message: format!("Invalid query: {}", err),
    }
    .into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(recommend::index)).service(
        web::scope("/api")
            .configure(recommend::configure)
            .configure(career::configure),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_top_n_resolution() {
        let limits = RequestLimits {
            default_top_n: 5,
            ..Default::default()
        };

        assert_eq!(limits.top_n(None), 5);
        assert_eq!(limits.top_n(Some(0)), 0);
        assert_eq!(limits.top_n(Some(7)), 7);
        assert_eq!(limits.top_n(Some(500)), 500);
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::invalid_argument("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unavailable("db".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(PostgresError::NotFound("user 1".into())).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
