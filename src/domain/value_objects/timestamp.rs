//! # Timestamp Value Object
//!
//! UTC timestamp wrapper for departure and arrival times.
//!
//! Upstream providers are inconsistent about time formats: one sends RFC
//! 3339, another sends naive `YYYY-MM-DD HH:MM` local strings. Both parse
//! into the same canonical type; naive inputs are taken at face value as
//! UTC since providers do not disclose the zone.
//!
//! # Examples
//!
//! ```
//! use fareflow::domain::value_objects::timestamp::Timestamp;
//!
//! let ts = Timestamp::parse_flexible("2025-06-01T08:30:00Z").unwrap();
//! assert_eq!(ts.hour(), 8);
//! ```

use crate::domain::errors::DomainError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp with minute-or-better precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Naive provider format without a timezone designator.
    const NAIVE_FORMATS: [&'static str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wraps an existing `chrono` datetime.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Parses RFC 3339 input, falling back to the naive provider formats.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTimestamp`] when no known format
    /// matches.
    pub fn parse_flexible(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        for format in Self::NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(Self(Utc.from_utc_datetime(&naive)));
            }
        }
        Err(DomainError::invalid_timestamp(input))
    }

    /// Returns the hour of day in `0..24`.
    #[inline]
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the inner `chrono` datetime.
    #[inline]
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Formats as RFC 3339.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let ts = Timestamp::parse_flexible("2025-06-01T22:15:00Z").unwrap();
        assert_eq!(ts.hour(), 22);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = Timestamp::parse_flexible("2025-06-01T22:15:00-03:00").unwrap();
        assert_eq!(ts.hour(), 1);
    }

    #[test]
    fn parses_naive_provider_format() {
        let ts = Timestamp::parse_flexible("2025-06-01 08:30").unwrap();
        assert_eq!(ts.hour(), 8);
        let ts = Timestamp::parse_flexible("2025-06-01 08:30:45").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Timestamp::parse_flexible("June 1st").is_err());
        assert!(Timestamp::parse_flexible("").is_err());
    }

    #[test]
    fn ordering() {
        let early = Timestamp::parse_flexible("2025-06-01T05:00:00Z").unwrap();
        let late = Timestamp::parse_flexible("2025-06-01T23:00:00Z").unwrap();
        assert!(early < late);
    }
}
