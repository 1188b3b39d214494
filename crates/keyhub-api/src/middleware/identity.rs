//! Session resolution middleware.
//!
//! Runs once per request: a `Bearer` session token is decoded into an
//! [`Identity`] and stored in the request extensions as
//! [`ResolvedIdentity`]. Requests without an `Authorization` header pass
//! through anonymously; a header that is present but invalid is rejected.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use keyhub_core::error::AppError;
use keyhub_core::types::UserId;
use keyhub_service::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller identity established for this request, if any.
#[derive(Debug, Clone)]
pub struct ResolvedIdentity(pub Option<Identity>);

/// Decode the session token and attach the caller identity.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => {
            let token = value
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

            let claims = state.jwt_decoder.decode_session(token)?;
            Some(Identity::new(
                UserId::from_uuid(claims.user_id()),
                &claims.email,
                claims.name,
            ))
        }
    };

    let resolved = ResolvedIdentity(identity);
    request.extensions_mut().insert(resolved.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(resolved);
    Ok(response)
}
