//! Validation errors shared by the storefront and admin crates.
//!
//! A validation error always aborts the operation before any state is
//! written, so callers can report it and let the user correct the input.

use thiserror::Error;

use crate::types::EmailError;

/// User input that cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Checkout attempted with no cart lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A required field was left blank.
    #[error("required field is missing: {0}")]
    MissingField(&'static str),

    /// Email does not have a usable shape.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Postal code does not contain exactly eight digits.
    #[error("postal code must have 8 digits: {0:?}")]
    InvalidPostalCode(String),

    /// A numeric field is out of its allowed range.
    #[error("{field} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },

    /// The selected variation has no stock left.
    #[error("variation {0} is out of stock")]
    OutOfStock(String),

    /// The product or variation being added does not exist.
    #[error("unknown {kind}: {id}")]
    Unknown { kind: &'static str, id: String },

    /// A product draft must keep at least one variation row.
    #[error("a product needs at least one variation row")]
    LastVariationRow,

    /// A draft row index does not exist.
    #[error("no variation row at index {0}")]
    NoSuchRow(usize),

    /// A date field could not be parsed.
    #[error("invalid date for {field}: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
}

/// Require a non-blank text field.
///
/// # Errors
///
/// Returns `ValidationError::MissingField` if `value` is empty or whitespace.
pub fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("Ana", "name").is_ok());
        assert_eq!(
            require("  ", "name"),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ValidationError::EmptyCart.to_string(), "cart is empty");
        assert_eq!(
            ValidationError::MissingField("email").to_string(),
            "required field is missing: email"
        );
    }
}
