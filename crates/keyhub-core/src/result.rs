//! Convenience result type alias for KeyHub.

use crate::error::AppError;

/// A specialized `Result` type for KeyHub operations.
pub type AppResult<T> = Result<T, AppError>;
