//! Share management: access evaluation, invitations and share lifecycle.

pub mod access;
pub mod invitation;
pub mod link;
pub mod service;

pub use access::{
    AccessDecision, AccessEvaluator, AccessHint, AccessService, DenyReason, ShareView,
    SharedContent,
};
pub use invitation::InvitationService;
pub use link::LinkService;
pub use service::{CreateShareInput, ShareDetails, ShareService};
