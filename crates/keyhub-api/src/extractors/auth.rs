//! Identity extractors backed by the identity middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use keyhub_core::error::AppError;
use keyhub_service::Identity;

use crate::error::ApiError;
use crate::middleware::ResolvedIdentity;

/// An authenticated caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl std::ops::Deref for AuthUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The caller, if authenticated.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

fn resolved(parts: &Parts) -> Option<Identity> {
    parts
        .extensions
        .get::<ResolvedIdentity>()
        .and_then(|r| r.0.clone())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolved(parts)
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Authentication required").into())
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolved(parts)))
    }
}
