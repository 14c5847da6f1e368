//! Result type alias for tailor operations

use crate::error::TailorError;

/// Standard Result type for tailor operations
pub type Result<T> = std::result::Result<T, TailorError>;
