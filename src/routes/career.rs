use super::{ApiError, AppState, AuthUser, MaybeAuthUser};
use crate::models::{
    AnalyzePdfQuery, AnalyzeResumeRequest, ChatRequest, ChatResponse, EvaluateAnswerRequest,
    InterviewQuestionsRequest, NewApplicationRequest, QuestionsResponse, QuizResponse,
    QuizSubmission, ResumeAnalysis, SaveProfileRequest,
};
use crate::services::{extract_pdf_text, ResumeError, StoredProfile, User};
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use validator::Validate;

const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// Configure resume, interview, quiz and account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/resume/analyze", web::post().to(analyze_resume))
        .service(
            web::resource("/resume/analyze/pdf")
                .app_data(web::PayloadConfig::new(MAX_RESUME_BYTES))
                .route(web::post().to(analyze_resume_pdf)),
        )
        .route("/interview/questions", web::post().to(interview_questions))
        .route("/interview/evaluate", web::post().to(evaluate_answer))
        .route("/chat", web::post().to(chat))
        // Registered before /quiz/{subject} so "score" is not taken as a subject
        .route("/quiz/score", web::post().to(submit_quiz))
        .route("/quiz/{subject}", web::get().to(get_quiz))
        .route("/auth/me", web::get().to(current_user))
        .route("/auth/profile", web::post().to(save_profile))
        .service(
            web::resource("/applications")
                .route(web::get().to(list_applications))
                .route(web::post().to(add_application)),
        )
        .route("/dashboard/stats", web::get().to(dashboard_stats));
}

async fn analyze_resume(
    state: web::Data<AppState>,
    user: MaybeAuthUser,
    req: web::Json<AnalyzeResumeRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let analysis = state
        .assistant
        .analyze_resume(&req.resume_text, &req.job_description)
        .await;
    record_scan(&state, user, &analysis).await;

    Ok(HttpResponse::Ok().json(analysis))
}

/// POST /api/resume/analyze/pdf?jobDescription=... with the raw PDF as body
async fn analyze_resume_pdf(
    state: web::Data<AppState>,
    user: MaybeAuthUser,
    query: web::Query<AnalyzePdfQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let text = web::block(move || extract_pdf_text(&body))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| match e {
            ResumeError::EmptyUpload => ApiError::invalid_argument("No resume file uploaded"),
            other => ApiError::invalid_argument(other.to_string()),
        })?;

    let analysis = state
        .assistant
        .analyze_resume(&text, &query.job_description)
        .await;
    record_scan(&state, user, &analysis).await;

    Ok(HttpResponse::Ok().json(analysis))
}

async fn record_scan(state: &AppState, user: MaybeAuthUser, analysis: &ResumeAnalysis) {
    let (MaybeAuthUser(Some(user_id)), Some(db)) = (user, state.postgres.as_ref()) else {
        return;
    };

    if let Err(e) = db
        .record_ats_scan(user_id, "Custom Scan", analysis.score, &analysis.missing_keywords)
        .await
    {
        tracing::warn!("Failed to record resume scan for user {}: {}", user_id, e);
    }
}

async fn interview_questions(
    state: web::Data<AppState>,
    req: web::Json<InterviewQuestionsRequest>,
) -> impl Responder {
    let questions = state.assistant.generate_questions(&req.role, &req.topic).await;
    HttpResponse::Ok().json(QuestionsResponse { questions })
}

async fn evaluate_answer(
    state: web::Data<AppState>,
    req: web::Json<EvaluateAnswerRequest>,
) -> impl Responder {
    let evaluation = state.assistant.evaluate_answer(&req.question, &req.answer).await;
    HttpResponse::Ok().json(evaluation)
}

async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    let reply = state.assistant.chat(&req.message, &req.history).await;
    HttpResponse::Ok().json(ChatResponse { reply })
}

async fn get_quiz(state: web::Data<AppState>, subject: web::Path<String>) -> impl Responder {
    let subject = subject.into_inner().to_lowercase();
    let questions = state.quiz.questions(&subject);
    HttpResponse::Ok().json(QuizResponse { subject, questions })
}

async fn submit_quiz(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<QuizSubmission>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let AuthUser(user_id) = user;
    let result = state.quiz.grade(&req.subject, &req.answers);

    if let Some(db) = &state.postgres {
        if let Err(e) = db
            .record_quiz_result(user_id, &req.subject.to_lowercase(), result.score, result.total)
            .await
        {
            tracing::warn!("Failed to record quiz result for user {}: {}", user_id, e);
        }
    }

    Ok(HttpResponse::Ok().json(result))
}

#[derive(Debug, Serialize)]
struct CurrentUser {
    #[serde(flatten)]
    user: User,
    profile: Option<StoredProfile>,
}

async fn current_user(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, ApiError> {
    let db = state.db()?;
    let AuthUser(user_id) = user;

    let current = CurrentUser {
        user: db.get_user(user_id).await?,
        profile: db.get_profile(user_id).await?,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": current })))
}

async fn save_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<SaveProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let db = state.db()?;
    let AuthUser(user_id) = user;

    db.save_profile(user_id, &req.profile, &req.details).await?;
    tracing::info!("Saved profile for user {}", user_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Saved",
        "profile": req.into_inner(),
    })))
}

async fn list_applications(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let applications = state.db()?.list_applications(user.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "applications": applications })))
}

async fn add_application(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<NewApplicationRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let db = state.db()?;

    let application = db
        .add_application(user.0, &req.company, &req.role, req.link.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Application tracked",
        "application": application,
    })))
}

async fn dashboard_stats(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let stats = state.db()?.dashboard_stats(user.0).await?;
    Ok(HttpResponse::Ok().json(stats))
}
