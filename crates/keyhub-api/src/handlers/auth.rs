//! Identity synchronization handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/sync
///
/// Upserts the caller's local user record. Clients call this after login.
pub async fn sync_identity(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.ensure_user(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
