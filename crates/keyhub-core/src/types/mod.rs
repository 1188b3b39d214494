//! Core type definitions used across the KeyHub workspace.

pub mod email;
pub mod id;

pub use email::normalize_email;
pub use id::*;
