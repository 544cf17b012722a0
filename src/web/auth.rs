//! # JWT Authentication
//!
//! HS256 bearer tokens for API access plus the [`AuthUser`] extractor that
//! guards authenticated routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::errors::ApiError;
use super::state::AppState;

/// JWT authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    #[error("JWT processing error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Mints and verifies HS256 access tokens
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Mint an access token for the given user
    pub fn generate_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.expiry_hours)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate a token and return the user id it was minted for
    pub fn verify_token(&self, token: &str) -> Result<i64, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;

        data.claims
            .sub
            .parse()
            .map_err(|_| AuthError::TokenValidation("subject is not a user id".to_string()))
    }
}

/// Extractor for the authenticated user id.
///
/// Pulls the bearer token from the Authorization header and verifies it
/// against the app's authenticator; failures reject with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?
            .trim();

        match state.auth.verify_token(token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                debug!(error = %e, "Rejected bearer token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let auth = JwtAuthenticator::new("test-secret", 1);
        let token = auth.generate_token(42).unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let minting = JwtAuthenticator::new("secret-a", 1);
        let verifying = JwtAuthenticator::new("secret-b", 1);

        let token = minting.generate_token(42).unwrap();
        assert!(verifying.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = JwtAuthenticator::new("test-secret", 1);
        assert!(auth.verify_token("not-a-token").is_err());
    }
}
