use super::{ApiError, AppState};
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// Caller authenticated by a bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Caller that may or may not present a valid bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeAuthUser(pub Option<i64>);

fn authorize(req: &HttpRequest) -> Result<i64, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;

    let verifier = state
        .tokens
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Authentication is not configured".to_string()))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    verifier
        .verify_header(header)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authorize(req).map(AuthUser))
    }
}

impl FromRequest for MaybeAuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = match authorize(req) {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                if req.headers().contains_key(header::AUTHORIZATION) {
                    tracing::debug!("Ignoring unusable credentials on {}: {}", req.path(), e);
                }
                None
            }
        };

        ready(Ok(MaybeAuthUser(user)))
    }
}
