//! # Location Code Value Object
//!
//! IATA-like location codes for airports and metropolitan areas.
//!
//! Providers accept and return three-letter airport codes (`GRU`, `LIS`)
//! but some also understand longer metropolitan-area identifiers, so the
//! only structural requirement is "at least three alphanumeric characters".
//! Codes are normalized to uppercase on construction.
//!
//! # Examples
//!
//! ```
//! use fareflow::domain::value_objects::location::LocationCode;
//!
//! let code = LocationCode::new("gru").unwrap();
//! assert_eq!(code.as_str(), "GRU");
//! ```

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated IATA-like location code.
///
/// # Invariants
///
/// - At least three characters
/// - ASCII alphanumeric only
/// - Stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationCode(String);

impl LocationCode {
    /// Creates a new location code, validating and uppercasing the input.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLocationCode`] if the input is shorter
    /// than three characters or contains non-alphanumeric characters.
    pub fn new(code: impl AsRef<str>) -> Result<Self, DomainError> {
        let code = code.as_ref().trim();
        if code.len() < 3 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_location_code(code));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocationCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocationCode> for String {
    fn from(value: LocationCode) -> Self {
        value.0
    }
}
