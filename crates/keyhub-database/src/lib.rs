//! # keyhub-database
//!
//! Persistence for KeyHub. The store traits in [`store`] are the seam the
//! service layer depends on; [`repositories`] implements them on
//! PostgreSQL and [`memory`] implements them in-process for development
//! and tests. [`Stores`] bundles one implementation of each.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{GroupStore, InvitationStore, ShareStore, UserStore};
pub use stores::Stores;
