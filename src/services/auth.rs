use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while checking an access token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(String),
}

/// Access token claims; `sub` carries the user id as a string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// HS256 verifier for tokens minted by the identity service
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a token and return the user id it names
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        data.claims
            .sub
            .trim()
            .parse()
            .map_err(|_| AuthError::InvalidSubject(data.claims.sub))
    }

    /// Validate the value of an `Authorization: Bearer ...` header
    pub fn verify_header(&self, header: Option<&str>) -> Result<i64, AuthError> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }

    /// Mint a token for a user, valid for `ttl_secs`
    pub fn issue(&self, user_id: i64, ttl_secs: u64) -> Result<String, AuthError> {
        let exp = chrono::Utc::now().timestamp() as u64 + ttl_secs;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp as usize,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}
