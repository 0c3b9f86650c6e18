//! Brazilian postal code (CEP).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An eight-digit postal code, stored without punctuation.
///
/// Input is accepted in any punctuation (`01310-100`, `01.310-100`,
/// `01310100`): every non-digit character is stripped before the length is
/// checked.
///
/// ```
/// use shopkeep_core::PostalCode;
///
/// let cep = PostalCode::parse("01310-100").unwrap();
/// assert_eq!(cep.digits(), "01310100");
/// assert_eq!(cep.formatted(), "01310-100");
/// assert!(PostalCode::parse("1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a valid postal code.
    pub const DIGITS: usize = 8;

    /// Parse a postal code, ignoring punctuation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPostalCode` unless exactly eight
    /// digits remain after stripping non-digit characters.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let digits = Self::strip(input);
        if digits.len() == Self::DIGITS {
            Ok(Self(digits))
        } else {
            Err(ValidationError::InvalidPostalCode(input.to_owned()))
        }
    }

    /// Whether `input` would parse. Used to decide when a lookup should fire
    /// while the buyer is still typing.
    #[must_use]
    pub fn is_complete(input: &str) -> bool {
        input.chars().filter(char::is_ascii_digit).count() == Self::DIGITS
    }

    /// Digits only, as sent to the lookup service.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Display form `NNNNN-NNN`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let (head, tail) = self.0.split_at(5);
        format!("{head}-{tail}")
    }

    fn strip(input: &str) -> String {
        input.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}
