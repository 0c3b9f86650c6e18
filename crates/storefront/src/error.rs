//! Unified error handling for storefront operations.
//!
//! Every fallible storefront operation returns `Result<T, AppError>`, so a
//! front end can tell input problems (show them to the buyer) from storage
//! and network failures (log them).

use shopkeep_core::{StoreError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::viacep::LookupError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Buyer input was rejected; nothing was written.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Reading or writing a collection failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// The address lookup client could not be set up.
    #[error("Address lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether the error was caused by buyer input rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        let err: AppError = ValidationError::EmptyCart.into();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Invalid input: cart is empty");

        let err: AppError = StoreError::Poisoned.into();
        assert!(!err.is_user_error());
    }
}
