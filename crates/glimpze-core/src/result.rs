//! Convenience result type alias for Glimpze.

use crate::error::AppError;

/// A specialized `Result` type for Glimpze operations.
pub type AppResult<T> = Result<T, AppError>;
