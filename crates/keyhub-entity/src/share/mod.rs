//! Share and invitation entities.

pub mod invitation;
pub mod model;

pub use invitation::{Invitation, InvitationStatus};
pub use model::{CreateShare, Share, ShareType};
