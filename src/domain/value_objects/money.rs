//! # Money Value Object
//!
//! Decimal amount paired with an ISO 4217 currency code.
//!
//! Offer prices are decimal strings on the wire (`"280.50"`); internally
//! they are [`rust_decimal::Decimal`] values so sorting and range checks
//! are exact. Serialization keeps the string form.
//!
//! # Examples
//!
//! ```
//! use fareflow::domain::value_objects::money::{CurrencyCode, Money};
//!
//! let price = Money::new("280.50".parse().unwrap(), CurrencyCode::new("EUR").unwrap());
//! assert_eq!(price.to_string(), "280.50 EUR");
//! ```

use crate::domain::errors::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated ISO 4217 currency code.
///
/// # Invariants
///
/// - Exactly three characters
/// - ASCII alphabetic only
/// - Stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a new currency code, validating and uppercasing the input.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCurrencyCode`] if the input is not
    /// three ASCII letters.
    pub fn new(code: impl AsRef<str>) -> Result<Self, DomainError> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::invalid_currency_code(code));
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

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// A monetary amount with its currency.
///
/// Comparison helpers operate on the numeric total; callers comparing
/// prices across offers rely on the aggregation layer normalizing
/// currencies per provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Total amount, serialized as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    total: Decimal,
    /// ISO 4217 currency code.
    currency: CurrencyCode,
}

impl Money {
    /// Creates a new monetary amount.
    #[must_use]
    pub fn new(total: Decimal, currency: CurrencyCode) -> Self {
        Self { total, currency }
    }

    /// Parses a decimal string into a monetary amount.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if the string is not a valid
    /// decimal number.
    pub fn parse(total: &str, currency: CurrencyCode) -> Result<Self, DomainError> {
        let total = total
            .trim()
            .parse::<Decimal>()
            .map_err(|_| DomainError::invalid_amount(total))?;
        Ok(Self { total, currency })
    }

    /// Returns the numeric total.
    #[inline]
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Returns the sum of this amount and another.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CurrencyMismatch`] when the currencies differ,
    /// [`DomainError::InvalidAmount`] on overflow.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::currency_mismatch(
                self.currency.as_str(),
                other.currency.as_str(),
            ));
        }
        let total = self
            .total
            .checked_add(other.total)
            .ok_or_else(|| DomainError::invalid_amount("amount overflow"))?;
        Ok(Self::new(total, self.currency.clone()))
    }

    /// Returns this amount scaled by a factor, e.g. for discounts.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] on overflow.
    pub fn checked_mul(&self, factor: Decimal) -> Result<Self, DomainError> {
        let total = self
            .total
            .checked_mul(factor)
            .ok_or_else(|| DomainError::invalid_amount("amount overflow"))?;
        Ok(Self::new(total, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.total, self.currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn eur() -> CurrencyCode {
        CurrencyCode::new("EUR").unwrap()
    }

    #[test]
    fn currency_code_validation() {
        assert_eq!(CurrencyCode::new("brl").unwrap().as_str(), "BRL");
        assert!(CurrencyCode::new("EU").is_err());
        assert!(CurrencyCode::new("EUR1").is_err());
    }

    #[test]
    fn parse_decimal_string() {
        let money = Money::parse("280.50", eur()).unwrap();
        assert_eq!(money.total(), "280.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Money::parse("abc", eur()).is_err());
    }

    #[test]
    fn checked_add_same_currency() {
        let a = Money::parse("100.00", eur()).unwrap();
        let b = Money::parse("50.25", eur()).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().total().to_string(), "150.25");
    }

    #[test]
    fn checked_add_rejects_currency_mismatch() {
        let a = Money::parse("100.00", eur()).unwrap();
        let b = Money::parse("50.25", CurrencyCode::new("BRL").unwrap()).unwrap();
        assert!(a.checked_add(&b).is_err());
    }

    #[test]
    fn serializes_total_as_string() {
        let money = Money::parse("320.00", eur()).unwrap();
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["total"], "320.00");
        assert_eq!(json["currency"], "EUR");
    }
}
