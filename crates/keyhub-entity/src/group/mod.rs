//! Group domain entities.

pub mod item;
pub mod model;
pub mod snapshot;

pub use item::{CreateItem, GroupItem, ItemTag};
pub use model::{CreateGroup, Group, GroupSummary};
pub use snapshot::{GroupSnapshot, OwnerSummary};
