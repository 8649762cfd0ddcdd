//! Convenience result type alias for CipherDrive.

use crate::error::AppError;

/// A specialized `Result` type for CipherDrive operations.
pub type AppResult<T> = Result<T, AppError>;
