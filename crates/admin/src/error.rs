//! Error type for operator actions.

use shopkeep_core::{StoreError, ValidationError};
use thiserror::Error;

/// Errors returned by the admin managers.
///
/// Unknown identities are not errors: they resolve to a no-op outcome.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Operator input was rejected; nothing was written.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Reading or writing a collection failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
