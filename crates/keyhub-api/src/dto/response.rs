//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keyhub_entity::{GroupItem, GroupSummary, Invitation, InvitationStatus, ShareType, User};
use keyhub_service::{AccessHint, DenyReason, ShareDetails, SharedContent};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Group summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    /// Group ID.
    pub id: Uuid,
    /// Group name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

impl From<GroupSummary> for GroupResponse {
    fn from(group: GroupSummary) -> Self {
        Self {
            id: group.id.into_uuid(),
            name: group.name,
            description: group.description,
        }
    }
}

/// An invitation as shown to the share owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    /// Invitation ID.
    pub id: i64,
    /// Share ID.
    pub share_id: String,
    /// Invitee email.
    pub email: String,
    /// `PENDING`, `ACCEPTED` or `REJECTED`.
    pub status: InvitationStatus,
    /// When the invitation was created.
    pub invited_at: DateTime<Utc>,
    /// When the invitee answered.
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<Invitation> for InvitationResponse {
    fn from(inv: Invitation) -> Self {
        Self {
            id: inv.id,
            share_id: inv.share_id.as_str().to_string(),
            email: inv.email,
            status: inv.status,
            invited_at: inv.invited_at,
            responded_at: inv.responded_at,
        }
    }
}

/// A share as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    /// Share ID.
    pub id: String,
    /// `PUBLIC` or `PRIVATE`.
    #[serde(rename = "type")]
    pub share_type: ShareType,
    /// Owner user ID.
    pub owner_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Public link.
    pub share_url: String,
    /// Shared group.
    pub group: GroupResponse,
    /// Invitations, oldest first.
    pub invitations: Vec<InvitationResponse>,
}

impl From<ShareDetails> for ShareResponse {
    fn from(details: ShareDetails) -> Self {
        Self {
            id: details.share.id.as_str().to_string(),
            share_type: details.share.share_type,
            owner_id: details.share.owner_id.into_uuid(),
            created_at: details.share.created_at,
            share_url: details.share_url,
            group: details.group.into(),
            invitations: details.invitations.into_iter().map(Into::into).collect(),
        }
    }
}

/// One item of a shared group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    /// Item ID.
    pub id: Uuid,
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
    /// Description.
    pub description: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl From<GroupItem> for ItemResponse {
    fn from(item: GroupItem) -> Self {
        Self {
            id: item.id.into_uuid(),
            key: item.key,
            value: item.value,
            description: item.description,
            tags: item.tags.into_iter().map(|t| t.tag).collect(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Owner of a shared group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    /// Display name.
    pub name: Option<String>,
    /// Email.
    pub email: String,
}

/// Shared group contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedGroupResponse {
    /// Share ID.
    pub share_id: String,
    /// `PUBLIC` or `PRIVATE`.
    #[serde(rename = "type")]
    pub share_type: ShareType,
    /// The group.
    pub group: GroupResponse,
    /// Group owner.
    pub owner: OwnerResponse,
    /// Items in creation order.
    pub items: Vec<ItemResponse>,
}

impl From<SharedContent> for SharedGroupResponse {
    fn from(content: SharedContent) -> Self {
        let SharedContent { share, snapshot } = content;
        Self {
            share_id: share.id.as_str().to_string(),
            share_type: share.share_type,
            group: snapshot.group.summary().into(),
            owner: OwnerResponse {
                name: snapshot.owner.name,
                email: snapshot.owner.email,
            },
            items: snapshot.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// `GET /api/shares/{shareId}/content` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    /// Whether the caller may see the group.
    pub can_view: bool,
    /// Denial reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// What the caller can do next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<AccessHint>,
    /// Shorthand for `hint == NEEDS_LOGIN`.
    pub needs_login: bool,
    /// Shorthand for `hint == NEEDS_ACCEPTANCE`.
    pub needs_acceptance: bool,
    /// Invitee email read from a valid invitation token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_email: Option<String>,
    /// Group contents when allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<SharedGroupResponse>,
}

impl ContentResponse {
    /// Access granted.
    pub fn granted(content: SharedContent) -> Self {
        Self {
            can_view: true,
            reason: None,
            hint: None,
            needs_login: false,
            needs_acceptance: false,
            invited_email: None,
            share: Some(content.into()),
        }
    }

    /// Access denied.
    pub fn denied(reason: DenyReason, invited_email: Option<String>) -> Self {
        let hint = reason.hint();
        Self {
            can_view: false,
            reason: Some(reason.message().to_string()),
            hint: Some(hint),
            needs_login: hint == AccessHint::NeedsLogin,
            needs_acceptance: hint == AccessHint::NeedsAcceptance,
            invited_email,
            share: None,
        }
    }
}

/// Local user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// First seen.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_uuid(),
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Store backend name.
    pub backend: String,
    /// Store connectivity.
    pub database: String,
    /// Mail provider name.
    pub mail_provider: String,
}
