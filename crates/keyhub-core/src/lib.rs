//! # keyhub-core
//!
//! Core crate for KeyHub. Contains configuration schemas, typed
//! identifiers, the mail collaborator trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other KeyHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
