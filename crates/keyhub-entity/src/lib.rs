//! # keyhub-entity
//!
//! Domain entity models for KeyHub: users, groups with their items and
//! tags, shares, and share invitations. Enums map to PostgreSQL enum types
//! through `sqlx::Type`.

pub mod group;
pub mod share;
pub mod user;

pub use group::{
    CreateGroup, CreateItem, Group, GroupItem, GroupSnapshot, GroupSummary, ItemTag, OwnerSummary,
};
pub use share::{CreateShare, Invitation, InvitationStatus, Share, ShareType};
pub use user::{SyncUser, User};
