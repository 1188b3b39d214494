//! Invitation response and resend handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use keyhub_core::types::ShareId;

use crate::dto::request::TokenQuery;
use crate::dto::response::{ApiResponse, InvitationResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeUser};
use crate::state::AppState;

/// POST /api/shares/{share_id}/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Path(share_id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ApiResponse<InvitationResponse>>, ApiError> {
    let invitation = state
        .invitation_service
        .accept(&ShareId::from_string(share_id), query.token(), caller.as_ref())
        .await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}

/// POST /api/shares/{share_id}/reject
pub async fn reject_invitation(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ApiResponse<InvitationResponse>>, ApiError> {
    let invitation = state
        .invitation_service
        .reject(&ShareId::from_string(share_id), query.token())
        .await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}

/// POST /api/shares/{share_id}/invitations/{email}/resend
pub async fn resend_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((share_id, email)): Path<(String, String)>,
) -> Result<Json<ApiResponse<InvitationResponse>>, ApiError> {
    let invitation = state
        .invitation_service
        .resend(&ShareId::from_string(share_id), &email, &auth)
        .await?;
    Ok(Json(ApiResponse::ok(invitation.into())))
}
