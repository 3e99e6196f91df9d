//! Session token signing and verification
//!
//! Tokens are HS256 JWTs carrying the caller's identity. A verified token is
//! trusted for its whole lifetime: the identity is never re-read from storage,
//! so a renamed user keeps the old username until they log in again.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Identity embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: Identity,
    pub iat: i64,
    pub exp: i64,
}

/// Stateless token issuer/verifier
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Sign a token for `identity` valid for the configured lifetime
    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_with_ttl(identity, self.ttl)
    }

    pub fn issue_with_ttl(&self, identity: &Identity, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user: identity.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry, yielding the embedded identity
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthenticated(
                "No token, authorization denied".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims.user),
            Err(err) => Err(match err.kind() {
                ErrorKind::ExpiredSignature => AppError::Expired,
                ErrorKind::InvalidSignature => AppError::InvalidSignature,
                _ => AppError::Unauthenticated("Token is not valid".to_string()),
            }),
        }
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
