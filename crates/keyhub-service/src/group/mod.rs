//! Groups of key/value items owned by a user.

pub mod service;

pub use service::GroupService;
