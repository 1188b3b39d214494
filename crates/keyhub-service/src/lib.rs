//! # keyhub-service
//!
//! Business logic service layer for KeyHub. Services receive their stores,
//! codecs and collaborators as `Arc` references at construction time and
//! take the caller's [`Identity`] explicitly on every operation.

pub mod context;
pub mod group;
pub mod share;
pub mod user;

pub use context::Identity;
pub use group::GroupService;
pub use share::{
    AccessDecision, AccessEvaluator, AccessHint, AccessService, CreateShareInput, DenyReason,
    InvitationService, LinkService, ShareDetails, ShareService, ShareView, SharedContent,
};
pub use user::UserService;
