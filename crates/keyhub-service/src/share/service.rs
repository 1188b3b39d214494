//! Share CRUD service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::ValidateEmail;

use keyhub_core::error::AppError;
use keyhub_core::result::AppResult;
use keyhub_core::types::email::normalize_email_list;
use keyhub_core::types::{GroupId, ShareId, UserId};
use keyhub_database::{GroupStore, InvitationStore, ShareStore};
use keyhub_entity::{CreateShare, GroupSummary, Invitation, Share, ShareType};

use super::invitation::InvitationService;
use super::link::LinkService;
use crate::context::Identity;

/// Input for creating a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareInput {
    /// Group to share.
    pub group_id: GroupId,
    /// Public or private.
    pub share_type: ShareType,
    /// Invitees; required for private shares, ignored for public ones.
    #[serde(default)]
    pub emails: Vec<String>,
}

/// A share as seen by its owner.
#[derive(Debug, Clone, Serialize)]
pub struct ShareDetails {
    /// The share.
    pub share: Share,
    /// Public link to the share.
    pub share_url: String,
    /// The shared group.
    pub group: GroupSummary,
    /// Invitations, oldest first. Empty for public shares.
    pub invitations: Vec<Invitation>,
}

/// Manages share creation, listing, and revocation.
#[derive(Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    groups: Arc<dyn GroupStore>,
    invitations: Arc<dyn InvitationStore>,
    invitation_service: Arc<InvitationService>,
    links: Arc<LinkService>,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService")
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        groups: Arc<dyn GroupStore>,
        invitations: Arc<dyn InvitationStore>,
        invitation_service: Arc<InvitationService>,
        links: Arc<LinkService>,
    ) -> Self {
        Self {
            shares,
            groups,
            invitations,
            invitation_service,
            links,
        }
    }

    /// Share a group the caller owns.
    ///
    /// A group has at most one share; a second attempt fails with
    /// `CONFLICT` until the first is revoked.
    pub async fn create_share(
        &self,
        owner: &Identity,
        input: CreateShareInput,
    ) -> AppResult<ShareDetails> {
        let group = self
            .groups
            .find_owned(input.group_id, owner.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))?;

        let emails = match input.share_type {
            ShareType::Public => Vec::new(),
            ShareType::Private => {
                let emails = normalize_email_list(&input.emails);
                if emails.is_empty() {
                    return Err(AppError::validation(
                        "Private shares need at least one email address",
                    ));
                }
                if let Some(invalid) = emails.iter().find(|e| !e.validate_email()) {
                    return Err(AppError::validation(format!(
                        "Invalid email address: {invalid}"
                    )));
                }
                emails
            }
        };

        let share = self
            .shares
            .create(&CreateShare {
                id: ShareId::generate(),
                owner_id: owner.user_id,
                group_id: group.id,
                share_type: input.share_type,
            })
            .await?;

        info!(
            share_id = %share.id,
            group_id = %group.id,
            owner_id = %owner.user_id,
            share_type = %share.share_type,
            "Share created"
        );

        let invitations = if share.is_private() {
            match self
                .invitation_service
                .create_invitations(&share, &group, owner, &emails)
                .await
            {
                Ok(invitations) => invitations,
                Err(e) => {
                    // Deleting the share cascades to any invitations already written.
                    if let Err(cleanup) = self.shares.delete(&share.id).await {
                        warn!(share_id = %share.id, error = %cleanup, "Failed to remove share after invitation error");
                    }
                    return Err(e);
                }
            }
        } else {
            Vec::new()
        };

        Ok(ShareDetails {
            share_url: self.links.share_url(&share.id),
            group: group.summary(),
            share,
            invitations,
        })
    }

    /// Revoke a share; its invitations go with it.
    pub async fn revoke_share(&self, share_id: &ShareId, requester: UserId) -> AppResult<()> {
        self.owned(share_id, requester).await?;

        if !self.shares.delete(share_id).await? {
            return Err(AppError::not_found("Share not found"));
        }

        info!(share_id = %share_id, requester = %requester, "Share revoked");
        Ok(())
    }

    /// Shares created by `owner`, newest first.
    pub async fn list_shares(&self, owner: UserId) -> AppResult<Vec<ShareDetails>> {
        let shares = self.shares.list_by_owner(owner).await?;
        let mut details = Vec::with_capacity(shares.len());
        for share in shares {
            details.push(self.details(share).await?);
        }
        Ok(details)
    }

    /// One share owned by `requester`.
    pub async fn get_share(&self, share_id: &ShareId, requester: UserId) -> AppResult<ShareDetails> {
        let share = self.owned(share_id, requester).await?;
        self.details(share).await
    }

    async fn owned(&self, share_id: &ShareId, requester: UserId) -> AppResult<Share> {
        self.shares
            .find_by_id(share_id)
            .await?
            .filter(|s| s.is_owned_by(requester))
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    async fn details(&self, share: Share) -> AppResult<ShareDetails> {
        let group = self
            .groups
            .find_by_id(share.group_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Group of share {} is missing", share.id)))?;
        let invitations = self.invitations.list_by_share(&share.id).await?;

        Ok(ShareDetails {
            share_url: self.links.share_url(&share.id),
            group: group.summary(),
            share,
            invitations,
        })
    }
}
