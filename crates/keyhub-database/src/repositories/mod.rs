//! PostgreSQL implementations of the store traits.

pub mod group;
pub mod invitation;
pub mod share;
pub mod user;

pub use group::GroupRepository;
pub use invitation::InvitationRepository;
pub use share::ShareRepository;
pub use user::UserRepository;
