//! Local mirror of identity-provider users.

pub mod service;

pub use service::UserService;
