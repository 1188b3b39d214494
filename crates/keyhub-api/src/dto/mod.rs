//! Request and response DTOs. Bodies use camelCase field names.

pub mod request;
pub mod response;
