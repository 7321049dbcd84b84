use super::{ApiError, AppState, MaybeAuthUser};
use crate::models::{
    CatalogResponse, HealthResponse, LiveJobsQuery, LiveJobsResponse, Recommendation,
    RecommendRequest, RecommendResponse, ReloadResponse, SectorsResponse,
};
use crate::services::build_search_query;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure catalog and recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommend", web::post().to(recommend))
        .route("/sectors", web::get().to(sectors))
        .route("/internships", web::get().to(internships))
        .route("/internships/live", web::get().to(live_internships))
        .route("/catalog/reload", web::post().to(reload_catalog));
}

/// Service index
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Internship recommendation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/health",
            "/api/recommend",
            "/api/sectors",
            "/api/internships",
            "/api/internships/live",
        ],
    }))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = match &state.postgres {
        Some(db) => Some(db.health_check().await.unwrap_or(false)),
        None => None,
    };

    let status = if database == Some(false) { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: state.recommender.catalog().len(),
        database,
        assistant_online: state.assistant.is_online(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank the catalog for a profile
///
/// POST /api/recommend
///
/// Request body:
/// ```json
/// {
///   "education": "undergraduate",
///   "skills": ["python", "sql"],
///   "interests": ["data"],
///   "location": "Mumbai",
///   "previousExperience": false,
///   "topN": 5
/// }
/// ```
///
/// Live postings, when the feed is enabled, are placed ahead of the catalog
/// results. Signed-in callers also get their profile saved.
async fn recommend(
    state: web::Data<AppState>,
    user: MaybeAuthUser,
    req: web::Json<RecommendRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: {}", errors);
        return Err(errors.into());
    }

    let RecommendRequest { profile, top_n } = req.into_inner();
    let top_n = state.limits.top_n(top_n);

    let ranked = state.recommender.rank(&profile, top_n);
    tracing::info!(
        "Ranked {} of {} opportunities (topN {})",
        ranked.len(),
        state.recommender.catalog().len(),
        top_n
    );

    if let (MaybeAuthUser(Some(user_id)), Some(db)) = (user, state.postgres.as_ref()) {
        if let Err(e) = db.save_match_profile(user_id, &profile).await {
            tracing::warn!("Failed to save profile for user {}: {}", user_id, e);
        }
    }

    let mut recommendations = Vec::with_capacity(ranked.len() + state.limits.live_max_merged);

    if let Some(jobs) = &state.jobs {
        let query = build_search_query(&profile);
        let location = if profile.location.trim().is_empty() {
            state.limits.live_default_location.as_str()
        } else {
            profile.location.as_str()
        };

        match jobs.search(&query, location, state.limits.live_limit).await {
            Ok(postings) => {
                tracing::debug!("Merging {} live postings for {:?}", postings.len(), query);
                recommendations.extend(postings.into_iter().take(state.limits.live_max_merged).map(
                    |posting| {
                        Recommendation::live(posting, &profile.skills, state.limits.live_assigned_score)
                    },
                ));
            }
            Err(e) => tracing::warn!("Live job search failed, serving catalog only: {}", e),
        }
    }

    recommendations.extend(ranked.into_iter().map(Recommendation::from));

    Ok(HttpResponse::Ok().json(RecommendResponse {
        recommendations,
        profile,
    }))
}

async fn sectors(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(SectorsResponse {
        sectors: state.recommender.available_sectors(),
    })
}

async fn internships(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.recommender.catalog().snapshot();
    HttpResponse::Ok().json(CatalogResponse {
        total: snapshot.len(),
        internships: snapshot.to_vec(),
    })
}

/// Re-read the catalog document; the old catalog stays live on failure
async fn reload_catalog(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    match state.recommender.catalog().reload() {
        Ok(total) => Ok(HttpResponse::Ok().json(ReloadResponse { success: true, total })),
        Err(e) => {
            tracing::error!("Catalog reload failed: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

/// GET /api/internships/live?query=&location=
async fn live_internships(
    state: web::Data<AppState>,
    query: web::Query<LiveJobsQuery>,
) -> Result<HttpResponse, ApiError> {
    let jobs = state
        .jobs
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Live job search is disabled".to_string()))?;

    let LiveJobsQuery { query, location } = query.into_inner();
    let query = query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| "Intern".to_string());
    let location = location
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| state.limits.live_default_location.clone());

    let postings = match jobs.search(&query, &location, state.limits.live_limit).await {
        Ok(postings) => postings,
        Err(e) => {
            tracing::warn!("Live job search for {:?} failed: {}", query, e);
            Vec::new()
        }
    };

    Ok(HttpResponse::Ok().json(LiveJobsResponse { jobs: postings }))
}
