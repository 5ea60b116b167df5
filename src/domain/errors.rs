//! # Domain Errors
//!
//! Error types for value-object and entity construction.
//!
//! Domain errors represent violations of structural invariants: malformed
//! location codes, impossible date ranges, invalid amounts. They surface at
//! the caller boundary (form handling, deserialization) before any provider
//! is contacted.

use thiserror::Error;

/// Error type for domain validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Location code is too short or contains invalid characters.
    #[error("invalid location code: {0:?}")]
    InvalidLocationCode(String),

    /// Currency code is not three ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    /// Amount could not be parsed or overflowed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic across two different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Left-hand currency code.
        left: String,
        /// Right-hand currency code.
        right: String,
    },

    /// Duration string is not in the `PT#H#M` family.
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    /// Timestamp string matched no known provider format.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Return date precedes the departure date.
    #[error("return date {return_date} precedes departure date {departure_date}")]
    ReturnBeforeDeparture {
        /// Requested departure date.
        departure_date: String,
        /// Requested return date.
        return_date: String,
    },

    /// Passenger counts are out of range.
    #[error("invalid passenger count: {0}")]
    InvalidPassengerCount(String),

    /// An itinerary requires at least one segment.
    #[error("itinerary must contain at least one segment")]
    EmptyItinerary,
}

impl DomainError {
    /// Creates an invalid location code error.
    #[must_use]
    pub fn invalid_location_code(code: impl Into<String>) -> Self {
        Self::InvalidLocationCode(code.into())
    }

    /// Creates an invalid currency code error.
    #[must_use]
    pub fn invalid_currency_code(code: impl Into<String>) -> Self {
        Self::InvalidCurrencyCode(code.into())
    }

    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount(message.into())
    }

    /// Creates a currency mismatch error.
    #[must_use]
    pub fn currency_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Creates an invalid duration error.
    #[must_use]
    pub fn invalid_duration(input: impl Into<String>) -> Self {
        Self::InvalidDuration(input.into())
    }

    /// Creates an invalid timestamp error.
    #[must_use]
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        Self::InvalidTimestamp(input.into())
    }

    /// Creates an invalid passenger count error.
    #[must_use]
    pub fn invalid_passenger_count(message: impl Into<String>) -> Self {
        Self::InvalidPassengerCount(message.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_input() {
        let err = DomainError::invalid_location_code("G!");
        assert!(err.to_string().contains("G!"));
    }

    #[test]
    fn currency_mismatch_names_both_sides() {
        let err = DomainError::currency_mismatch("EUR", "BRL");
        let display = err.to_string();
        assert!(display.contains("EUR"));
        assert!(display.contains("BRL"));
    }
}
