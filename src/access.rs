use thiserror::Error;

/// Ownership check failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Access denied: cannot access another user's resources")]
    Forbidden,
}

/// Verify that the authenticated user matches the path user id.
///
/// Pure equality check, no I/O. Runs before any resource lookup on every
/// resource-scoped operation, reads included, so probing another user's ids
/// is indistinguishable from an ordinary 403.
pub fn authorize(token_user_id: &str, path_user_id: &str) -> Result<(), AccessError> {
    if token_user_id != path_user_id {
        return Err(AccessError::Forbidden);
    }
    Ok(())
}
