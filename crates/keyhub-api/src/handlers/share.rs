//! Share management and shared content handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use keyhub_core::types::ShareId;
use keyhub_service::{DenyReason, ShareView};

use crate::dto::request::{CreateShareRequest, TokenQuery};
use crate::dto::response::{ApiResponse, ContentResponse, ShareResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeUser};
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareResponse>>), ApiError> {
    let input = req.into_input()?;
    let details = state.share_service.create_share(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(details.into()))))
}

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ShareResponse>>>, ApiError> {
    let shares = state.share_service.list_shares(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(
        shares.into_iter().map(Into::into).collect(),
    )))
}

/// GET /api/shares/{share_id}
pub async fn get_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(share_id): Path<String>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    let details = state
        .share_service
        .get_share(&ShareId::from_string(share_id), auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(details.into())))
}

/// DELETE /api/shares/{share_id}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(share_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .share_service
        .revoke_share(&ShareId::from_string(share_id), auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/shares/{share_id}/content
///
/// 200 when allowed, 404 when the share does not exist, 403 for every
/// other denial. The body always describes the decision.
pub async fn get_content(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Path(share_id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<(StatusCode, Json<ContentResponse>), ApiError> {
    let share_id = ShareId::from_string(share_id);
    let view = state
        .access_service
        .view(&share_id, caller.as_ref(), query.token())
        .await?;

    let (status, body) = match view {
        ShareView::Granted(content) => (StatusCode::OK, ContentResponse::granted(*content)),
        ShareView::Denied {
            reason,
            invited_email,
        } => {
            let status = if reason == DenyReason::ShareNotFound {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::FORBIDDEN
            };
            (status, ContentResponse::denied(reason, invited_email))
        }
    };

    Ok((status, Json(body)))
}
