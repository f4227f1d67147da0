//! Custom Axum extractors
//!
//! - `ValidHomeId`: integer path id, 400 otherwise
//! - `JsonBody`: JSON body with decode failures reported as 400
//! - `ValidQuery`: query string with decode failures reported as 400
//! - `AuthUser` / `Realtor` / `Buyer`: bearer-token identity and role guards

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::server::AppState;
use crate::models::{User, UserType, ValidationError};

/// Extract and validate a numeric home id from path
pub struct ValidHomeId(pub i32);

impl<S> FromRequestParts<S> for ValidHomeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: rejection.body_text(),
                })
            })?;

        let id = id.parse::<i32>().map_err(|_| {
            ApiError::Validation(ValidationError::NotANumber {
                field: "id",
                value: id.clone(),
            })
        })?;

        Ok(Self(id))
    }
}

/// JSON request body; syntax and shape errors become validation errors
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                reason: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

/// Query string; undecodable parameters become validation errors
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: rejection.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}

/// Authenticated caller, loaded from the store by token claim
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthenticated {
                reason: "missing bearer token",
            })?;

        let claims = state.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            ApiError::Unauthenticated {
                reason: "invalid or expired token",
            }
        })?;

        let user = state
            .service
            .find_user(claims.id)
            .await?
            .ok_or(ApiError::Unauthenticated {
                reason: "token user no longer exists",
            })?;

        Ok(Self(user))
    }
}

fn require_role(user: User, role: UserType) -> Result<User, ApiError> {
    if user.user_type != role {
        tracing::warn!(
            user_id = user.id,
            user_type = %user.user_type,
            required = %role,
            "role check failed"
        );
        return Err(ApiError::Forbidden {
            reason: format!("{} role required", role),
        });
    }
    Ok(user)
}

/// Authenticated caller with the REALTOR role
pub struct Realtor(pub User);

impl FromRequestParts<Arc<AppState>> for Realtor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, UserType::Realtor).map(Self)
    }
}

/// Authenticated caller with the BUYER role
pub struct Buyer(pub User);

impl FromRequestParts<Arc<AppState>> for Buyer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, UserType::Buyer).map(Self)
    }
}
