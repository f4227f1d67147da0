//! Bearer tokens
//!
//! HS256 JWTs carrying the user id and name. The user's role is not in the
//! token; it is read from the store on every guarded request.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Default token lifetime in hours
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest accepted token lifetime in hours (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 8760;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token signing secret cannot be empty")]
    EmptySecret,

    #[error("token lifetime must be positive")]
    NonPositiveLifetime,

    #[error("token expiry is out of range")]
    ExpiryOverflow,

    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys derived from one shared secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        if ttl <= Duration::zero() {
            return Err(AuthError::NonPositiveLifetime);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Mint a token for `user`, valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOverflow)?;
        let claims = Claims {
            id: user.id,
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
