//! Share access control: decides who may read a shared group.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use keyhub_auth::InvitationTokenCodec;
use keyhub_core::error::AppError;
use keyhub_core::result::AppResult;
use keyhub_core::types::ShareId;
use keyhub_database::{InvitationStore, ShareStore};
use keyhub_entity::{GroupSnapshot, InvitationStatus, Share, ShareType};

use crate::context::Identity;
use crate::group::GroupService;

/// What a denied caller can do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessHint {
    /// Nothing the caller can do.
    None,
    /// Log in and try again.
    NeedsLogin,
    /// Accept the pending invitation.
    NeedsAcceptance,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No share with that id.
    ShareNotFound,
    /// Private share and no session.
    LoginRequired,
    /// No invitation for the caller's email.
    NotInvited,
    /// The caller rejected the invitation.
    Rejected,
    /// The invitation is still pending.
    PendingAcceptance,
}

impl DenyReason {
    /// Message returned to the client.
    pub fn message(self) -> &'static str {
        match self {
            Self::ShareNotFound => "share not found",
            Self::LoginRequired => "login required",
            Self::NotInvited => "not invited",
            Self::Rejected => "you rejected this invitation",
            Self::PendingAcceptance => "please accept the invitation first",
        }
    }

    /// Hint returned with the message.
    pub fn hint(self) -> AccessHint {
        match self {
            Self::LoginRequired => AccessHint::NeedsLogin,
            Self::PendingAcceptance => AccessHint::NeedsAcceptance,
            Self::ShareNotFound | Self::NotInvited | Self::Rejected => AccessHint::None,
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller may read the share.
    Allow,
    /// The caller may not.
    Deny(DenyReason),
}

/// Applies the share access rules.
///
/// Rules are checked in order and the first match wins:
/// missing share, public share, anonymous caller, owner, then the caller's
/// invitation status. Every outcome is a decision; only store failures are
/// errors.
#[derive(Clone)]
pub struct AccessEvaluator {
    invitations: Arc<dyn InvitationStore>,
}

impl std::fmt::Debug for AccessEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessEvaluator").finish_non_exhaustive()
    }
}

impl AccessEvaluator {
    /// Creates an evaluator reading invitations from `invitations`.
    pub fn new(invitations: Arc<dyn InvitationStore>) -> Self {
        Self { invitations }
    }

    /// Decide whether `caller` may read `share`.
    pub async fn evaluate(
        &self,
        share: Option<&Share>,
        caller: Option<&Identity>,
    ) -> AppResult<AccessDecision> {
        let Some(share) = share else {
            return Ok(AccessDecision::Deny(DenyReason::ShareNotFound));
        };

        if share.share_type == ShareType::Public {
            return Ok(AccessDecision::Allow);
        }

        let Some(caller) = caller else {
            return Ok(AccessDecision::Deny(DenyReason::LoginRequired));
        };

        if share.is_owned_by(caller.user_id) {
            return Ok(AccessDecision::Allow);
        }

        let decision = match self.invitations.find(&share.id, &caller.email).await? {
            None => AccessDecision::Deny(DenyReason::NotInvited),
            Some(inv) => match inv.status {
                InvitationStatus::Rejected => AccessDecision::Deny(DenyReason::Rejected),
                InvitationStatus::Pending => AccessDecision::Deny(DenyReason::PendingAcceptance),
                InvitationStatus::Accepted => AccessDecision::Allow,
            },
        };
        Ok(decision)
    }
}

/// A share together with the group contents it exposes.
#[derive(Debug, Clone)]
pub struct SharedContent {
    /// The share.
    pub share: Share,
    /// Full group contents.
    pub snapshot: GroupSnapshot,
}

/// Result of a content request.
#[derive(Debug, Clone)]
pub enum ShareView {
    /// Access granted.
    Granted(Box<SharedContent>),
    /// Access denied.
    Denied {
        /// Why.
        reason: DenyReason,
        /// Email carried by a valid invitation token for this share,
        /// reported to anonymous callers so a client can pre-fill login.
        invited_email: Option<String>,
    },
}

/// Serves shared group content through the [`AccessEvaluator`].
#[derive(Clone)]
pub struct AccessService {
    shares: Arc<dyn ShareStore>,
    groups: Arc<GroupService>,
    evaluator: AccessEvaluator,
    codec: Arc<InvitationTokenCodec>,
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService").finish_non_exhaustive()
    }
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        invitations: Arc<dyn InvitationStore>,
        groups: Arc<GroupService>,
        codec: Arc<InvitationTokenCodec>,
    ) -> Self {
        Self {
            shares,
            groups,
            evaluator: AccessEvaluator::new(invitations),
            codec,
        }
    }

    /// Load a share's content for `caller`.
    ///
    /// `token` never grants access. It only lets an anonymous caller learn
    /// which email the invitation was addressed to.
    pub async fn view(
        &self,
        share_id: &ShareId,
        caller: Option<&Identity>,
        token: Option<&str>,
    ) -> AppResult<ShareView> {
        let share = self.shares.find_by_id(share_id).await?;

        match self.evaluator.evaluate(share.as_ref(), caller).await? {
            AccessDecision::Allow => {
                let Some(share) = share else {
                    return Err(AppError::internal("Access granted to a missing share"));
                };
                let snapshot = self.groups.snapshot(share.group_id).await?.ok_or_else(|| {
                    AppError::internal(format!("Group of share {} is missing", share.id))
                })?;
                Ok(ShareView::Granted(Box::new(SharedContent { share, snapshot })))
            }
            AccessDecision::Deny(reason) => {
                debug!(share_id = %share_id, reason = reason.message(), "Share access denied");
                let invited_email = match (reason, caller, token) {
                    (DenyReason::LoginRequired, None, Some(token)) => self
                        .codec
                        .parse(token)
                        .filter(|claims| &claims.share_id == share_id)
                        .map(|claims| claims.email),
                    _ => None,
                };
                Ok(ShareView::Denied {
                    reason,
                    invited_email,
                })
            }
        }
    }
}
