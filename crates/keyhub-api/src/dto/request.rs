//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use keyhub_core::error::AppError;
use keyhub_core::types::GroupId;
use keyhub_entity::ShareType;
use keyhub_service::CreateShareInput;

/// `POST /api/shares` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// Group to share.
    #[validate(length(min = 1, message = "groupId is required"))]
    pub group_id: String,
    /// `PUBLIC` or `PRIVATE`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub share_type: String,
    /// Invitee emails for private shares.
    #[serde(default)]
    #[validate(length(max = 100, message = "Too many invitees"))]
    pub emails: Vec<String>,
}

impl CreateShareRequest {
    /// Validate and convert into the service input.
    pub fn into_input(self) -> Result<CreateShareInput, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

        let group_id: GroupId = self
            .group_id
            .parse()
            .map_err(|_| AppError::validation("groupId must be a UUID"))?;
        let share_type: ShareType = self
            .share_type
            .parse()
            .map_err(|_| AppError::validation("type must be PUBLIC or PRIVATE"))?;

        Ok(CreateShareInput {
            group_id,
            share_type,
            emails: self.emails,
        })
    }
}

/// `?token=` query parameter on invitation and content routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenQuery {
    /// Invitation token from the emailed link.
    pub token: Option<String>,
}

impl TokenQuery {
    /// The token, ignoring an empty value.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}
