//! Request validation helpers.

use crate::error::AppError;

/// Count-match check for operations that reference a set of ids (task
/// dependencies, task assignees): if N ids were requested and fewer than N
/// survived the scoped lookup, the whole call fails.
pub fn ensure_complete_set(requested: usize, found: usize, message: &str) -> Result<(), AppError> {
    if found == requested {
        Ok(())
    } else {
        Err(AppError::Validation(message.to_string()))
    }
}
