//! # Flight Duration Value Object
//!
//! ISO-8601-style durations (`PT5H30M`) with raw-minute conversion.
//!
//! Two of the upstream providers report durations as raw minutes; the
//! canonical form is the hour/minute string the offer schema uses on the
//! wire. Conversion is lossless in both directions.
//!
//! # Examples
//!
//! ```
//! use fareflow::domain::value_objects::duration::FlightDuration;
//!
//! let duration = FlightDuration::from_minutes(150);
//! assert_eq!(duration.to_string(), "PT2H30M");
//! assert_eq!(duration.total_minutes(), 150);
//! ```

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Duration of a flight leg or itinerary, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlightDuration {
    hours: u32,
    minutes: u32,
}

impl FlightDuration {
    /// A zero-length duration (`PT0M`).
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Creates a duration from a total number of minutes.
    ///
    /// # Examples
    ///
    /// ```
    /// use fareflow::domain::value_objects::duration::FlightDuration;
    ///
    /// assert_eq!(FlightDuration::from_minutes(90).to_string(), "PT1H30M");
    /// assert_eq!(FlightDuration::from_minutes(0).to_string(), "PT0M");
    /// ```
    #[must_use]
    pub const fn from_minutes(total_minutes: u32) -> Self {
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }

    /// Returns the duration as a total number of minutes.
    #[inline]
    #[must_use]
    pub const fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }

    /// Returns the hour component.
    #[inline]
    #[must_use]
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    /// Returns the minute component.
    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours == 0 && self.minutes == 0 {
            return write!(f, "PT0M");
        }
        write!(f, "PT")?;
        if self.hours > 0 {
            write!(f, "{}H", self.hours)?;
        }
        write!(f, "{}M", self.minutes)
    }
}

impl FromStr for FlightDuration {
    type Err = DomainError;

    /// Parses `PT#H#M`, `PT#H` and `PT#M` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("PT")
            .ok_or_else(|| DomainError::invalid_duration(s))?;

        let mut hours: u32 = 0;
        let mut minutes: u32 = 0;
        let mut digits = String::new();
        let mut seen_component = false;

        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                'H' => {
                    hours = digits
                        .parse()
                        .map_err(|_| DomainError::invalid_duration(s))?;
                    digits.clear();
                    seen_component = true;
                }
                'M' => {
                    minutes = digits
                        .parse()
                        .map_err(|_| DomainError::invalid_duration(s))?;
                    digits.clear();
                    seen_component = true;
                }
                _ => return Err(DomainError::invalid_duration(s)),
            }
        }

        if !seen_component || !digits.is_empty() {
            return Err(DomainError::invalid_duration(s));
        }

        Ok(Self::from_minutes(hours * 60 + minutes))
    }
}

impl TryFrom<String> for FlightDuration {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FlightDuration> for String {
    fn from(value: FlightDuration) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raw_minutes_to_canonical_string() {
        assert_eq!(FlightDuration::from_minutes(150).to_string(), "PT2H30M");
    }

    #[test]
    fn zero_renders_pt0m() {
        assert_eq!(FlightDuration::ZERO.to_string(), "PT0M");
        assert_eq!(FlightDuration::from_minutes(0), FlightDuration::ZERO);
    }

    #[test]
    fn sub_hour_keeps_minute_only_form() {
        assert_eq!(FlightDuration::from_minutes(45).to_string(), "PT45M");
    }

    #[test]
    fn round_trips_through_string() {
        for total in [0, 1, 59, 60, 61, 150, 600, 1439] {
            let duration = FlightDuration::from_minutes(total);
            let parsed: FlightDuration = duration.to_string().parse().unwrap();
            assert_eq!(parsed.total_minutes(), total);
        }
    }

    #[test]
    fn parses_hour_only_form() {
        let duration: FlightDuration = "PT5H".parse().unwrap();
        assert_eq!(duration.total_minutes(), 300);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("5H30M".parse::<FlightDuration>().is_err());
        assert!("PT".parse::<FlightDuration>().is_err());
        assert!("PT5X".parse::<FlightDuration>().is_err());
        assert!("PT5H3".parse::<FlightDuration>().is_err());
    }

    #[test]
    fn ordering_follows_total_minutes() {
        assert!(FlightDuration::from_minutes(90) < FlightDuration::from_minutes(120));
    }
}
