//! Invitation lifecycle: creation, delivery, resend, accept and reject.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use keyhub_auth::InvitationTokenCodec;
use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::traits::{InvitationEmail, Mailer};
use keyhub_core::types::email::normalize_email_list;
use keyhub_core::types::{ShareId, normalize_email};
use keyhub_database::{GroupStore, InvitationStore, ShareStore};
use keyhub_entity::{Group, Invitation, InvitationStatus, Share};

use super::link::LinkService;
use crate::context::Identity;

/// Manages invitations to private shares.
///
/// Status only ever moves out of `PENDING`, and every move is a
/// compare-and-set on the store so concurrent responses cannot both win.
#[derive(Clone)]
pub struct InvitationService {
    shares: Arc<dyn ShareStore>,
    invitations: Arc<dyn InvitationStore>,
    groups: Arc<dyn GroupStore>,
    codec: Arc<InvitationTokenCodec>,
    links: Arc<LinkService>,
    mailer: Arc<dyn Mailer>,
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService")
            .field("codec", &self.codec)
            .field("mailer", &self.mailer)
            .finish_non_exhaustive()
    }
}

impl InvitationService {
    /// Creates a new invitation service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        invitations: Arc<dyn InvitationStore>,
        groups: Arc<dyn GroupStore>,
        codec: Arc<InvitationTokenCodec>,
        links: Arc<LinkService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            shares,
            invitations,
            groups,
            codec,
            links,
            mailer,
        }
    }

    /// Invite `emails` to `share`.
    ///
    /// Emails are normalized and de-duplicated. Addresses that already have
    /// an invitation are skipped. For every new invitation an email is sent
    /// on a detached task; a delivery failure is logged and does not undo the
    /// invitation.
    pub async fn create_invitations(
        &self,
        share: &Share,
        group: &Group,
        inviter: &Identity,
        emails: &[String],
    ) -> AppResult<Vec<Invitation>> {
        let mut created = Vec::new();

        for email in normalize_email_list(emails) {
            let Some(invitation) = self.invitations.create_pending(&share.id, &email).await? else {
                continue;
            };

            let message = self.compose(&share.id, group, inviter, &invitation.email)?;
            let mailer = Arc::clone(&self.mailer);
            let to = invitation.email.clone();
            let share_id = share.id.clone();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_invitation(&to, &message).await {
                    warn!(share_id = %share_id, to = %to, error = %e, "Failed to deliver invitation email");
                }
            });

            created.push(invitation);
        }

        info!(
            share_id = %share.id,
            invited = created.len(),
            "Invitations created"
        );
        Ok(created)
    }

    /// Send a fresh token to an invitee whose invitation is still pending.
    ///
    /// The invitation row is left untouched. Delivery is awaited and its
    /// failure reported as `EXTERNAL_SERVICE`.
    pub async fn resend(
        &self,
        share_id: &ShareId,
        email: &str,
        requester: &Identity,
    ) -> AppResult<Invitation> {
        let share = self
            .shares
            .find_by_id(share_id)
            .await?
            .filter(|s| s.is_owned_by(requester.user_id))
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if !share.is_private() {
            return Err(AppError::invalid_state(
                "Public shares do not have invitations",
            ));
        }

        let email = normalize_email(email);
        let invitation = self
            .invitations
            .find(share_id, &email)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Invitation has already been {}",
                invitation.status
            )));
        }

        let group = self
            .groups
            .find_by_id(share.group_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Group of share {share_id} is missing")))?;

        let message = self.compose(share_id, &group, requester, &invitation.email)?;
        self.mailer
            .send_invitation(&invitation.email, &message)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Failed to deliver invitation email",
                    e,
                )
            })?;

        info!(share_id = %share_id, to = %invitation.email, "Invitation resent");
        Ok(invitation)
    }

    /// Accept an invitation.
    ///
    /// The invitee is identified by `token`, by the session `caller`, or by
    /// both, in which case the two emails must agree.
    pub async fn accept(
        &self,
        share_id: &ShareId,
        token: Option<&str>,
        caller: Option<&Identity>,
    ) -> AppResult<Invitation> {
        let token_email = match token.filter(|t| !t.trim().is_empty()) {
            Some(token) => Some(self.token_email(share_id, token)?),
            None => None,
        };

        let email = match (token_email, caller) {
            (Some(from_token), Some(caller)) if from_token != caller.email => {
                return Err(AppError::forbidden(
                    "This invitation was sent to a different email address",
                ));
            }
            (Some(from_token), _) => from_token,
            (None, Some(caller)) => caller.email.clone(),
            (None, None) => {
                return Err(AppError::unauthorized(
                    "Log in or use the link from your invitation email",
                ));
            }
        };

        self.private_share(share_id).await?;
        let invitation = self
            .invitations
            .find(share_id, &email)
            .await?
            .ok_or_else(|| AppError::forbidden("You are not invited to this share"))?;

        self.respond(invitation, InvitationStatus::Accepted).await
    }

    /// Reject an invitation. Only the emailed token identifies the invitee.
    pub async fn reject(&self, share_id: &ShareId, token: Option<&str>) -> AppResult<Invitation> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::validation("An invitation token is required"))?;
        let email = self.token_email(share_id, token)?;

        self.private_share(share_id).await?;
        let invitation = self
            .invitations
            .find(share_id, &email)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        self.respond(invitation, InvitationStatus::Rejected).await
    }

    /// Drive `invitation` to `target`.
    ///
    /// Repeating the current status succeeds without changes; leaving a
    /// terminal status fails. A lost compare-and-set re-reads the row and
    /// re-applies these rules.
    async fn respond(
        &self,
        mut invitation: Invitation,
        target: InvitationStatus,
    ) -> AppResult<Invitation> {
        loop {
            if invitation.status == target {
                return Ok(invitation);
            }
            if invitation.status.is_terminal() {
                return Err(AppError::invalid_state(format!(
                    "Invitation has already been {}",
                    invitation.status
                )));
            }

            match self
                .invitations
                .transition(invitation.id, InvitationStatus::Pending, target, Utc::now())
                .await?
            {
                Some(updated) => {
                    info!(
                        share_id = %updated.share_id,
                        email = %updated.email,
                        status = %updated.status,
                        "Invitation answered"
                    );
                    return Ok(updated);
                }
                None => {
                    invitation = self
                        .invitations
                        .find(&invitation.share_id, &invitation.email)
                        .await?
                        .ok_or_else(|| AppError::not_found("Invitation not found"))?;
                }
            }
        }
    }

    fn token_email(&self, share_id: &ShareId, token: &str) -> AppResult<String> {
        let claims = self
            .codec
            .parse(token)
            .ok_or_else(|| AppError::validation("Invalid invitation token"))?;
        if &claims.share_id != share_id {
            return Err(AppError::validation(
                "Invitation token does not belong to this share",
            ));
        }
        Ok(normalize_email(&claims.email))
    }

    async fn private_share(&self, share_id: &ShareId) -> AppResult<Share> {
        let share = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;
        if !share.is_private() {
            return Err(AppError::invalid_state(
                "Only private shares have invitations",
            ));
        }
        Ok(share)
    }

    fn compose(
        &self,
        share_id: &ShareId,
        group: &Group,
        inviter: &Identity,
        to: &str,
    ) -> AppResult<InvitationEmail> {
        let token = self.codec.issue(to, share_id)?;
        Ok(InvitationEmail {
            inviter_name: inviter.display_name().to_string(),
            inviter_email: inviter.email.clone(),
            group_name: group.name.clone(),
            accept_url: self.links.accept_url(share_id, &token),
            reject_url: self.links.reject_url(share_id, &token),
        })
    }
}
