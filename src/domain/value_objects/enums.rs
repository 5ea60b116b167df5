//! # Domain Enums
//!
//! Enumeration types for search and filtering concepts.
//!
//! - [`TravelClass`] - cabin class requested in a search
//! - [`TimeOfDay`] - departure time-of-day filter buckets
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing a domain enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {0} value: {1}")]
pub struct ParseEnumError(pub &'static str, pub String);

/// Cabin class requested in a flight search.
///
/// # Examples
///
/// ```
/// use fareflow::domain::value_objects::enums::TravelClass;
///
/// assert_eq!(TravelClass::Business.to_string(), "BUSINESS");
/// assert_eq!("FIRST".parse::<TravelClass>().unwrap(), TravelClass::First);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    /// Economy cabin.
    #[default]
    Economy,
    /// Premium economy cabin.
    PremiumEconomy,
    /// Business cabin.
    Business,
    /// First class cabin.
    First,
}

impl TravelClass {
    /// Returns the single-letter cabin code used by job-submission
    /// providers (`Y`, `W`, `C`, `F`).
    #[inline]
    #[must_use]
    pub const fn cabin_letter(self) -> &'static str {
        match self {
            Self::Economy => "Y",
            Self::PremiumEconomy => "W",
            Self::Business => "C",
            Self::First => "F",
        }
    }

    /// Returns the numeric cabin code used by query-string providers
    /// (`1`..`4`).
    #[inline]
    #[must_use]
    pub const fn cabin_digit(self) -> &'static str {
        match self {
            Self::Economy => "1",
            Self::PremiumEconomy => "2",
            Self::Business => "3",
            Self::First => "4",
        }
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Economy => write!(f, "ECONOMY"),
            Self::PremiumEconomy => write!(f, "PREMIUM_ECONOMY"),
            Self::Business => write!(f, "BUSINESS"),
            Self::First => write!(f, "FIRST"),
        }
    }
}

impl FromStr for TravelClass {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ECONOMY" => Ok(Self::Economy),
            "PREMIUM_ECONOMY" => Ok(Self::PremiumEconomy),
            "BUSINESS" => Ok(Self::Business),
            "FIRST" => Ok(Self::First),
            _ => Err(ParseEnumError("TravelClass", s.to_string())),
        }
    }
}

/// Departure time-of-day bucket used by the filter evaluator.
///
/// Buckets are half-open hour ranges covering the whole day:
/// night `[0, 6)`, morning `[6, 12)`, afternoon `[12, 18)`,
/// evening `[18, 24)`.
///
/// # Examples
///
/// ```
/// use fareflow::domain::value_objects::enums::TimeOfDay;
///
/// assert_eq!(TimeOfDay::of_hour(5), TimeOfDay::Night);
/// assert!(TimeOfDay::Morning.contains_hour(6));
/// assert!(!TimeOfDay::Morning.contains_hour(12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 00:00 (inclusive) to 06:00 (exclusive).
    Night,
    /// 06:00 (inclusive) to 12:00 (exclusive).
    Morning,
    /// 12:00 (inclusive) to 18:00 (exclusive).
    Afternoon,
    /// 18:00 (inclusive) to 24:00 (exclusive).
    Evening,
}

impl TimeOfDay {
    /// All buckets in day order.
    pub const ALL: [Self; 4] = [Self::Night, Self::Morning, Self::Afternoon, Self::Evening];

    /// Returns the bucket containing the given hour of day.
    ///
    /// Hours of 24 or more wrap into `[0, 24)`.
    #[must_use]
    pub const fn of_hour(hour: u32) -> Self {
        match hour % 24 {
            0..=5 => Self::Night,
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    /// Returns true if the given hour of day falls inside this bucket.
    #[inline]
    #[must_use]
    pub const fn contains_hour(self, hour: u32) -> bool {
        self as u8 == Self::of_hour(hour) as u8
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Night => write!(f, "night"),
            Self::Morning => write!(f, "morning"),
            Self::Afternoon => write!(f, "afternoon"),
            Self::Evening => write!(f, "evening"),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "night" => Ok(Self::Night),
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            _ => Err(ParseEnumError("TimeOfDay", s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn travel_class_round_trips() {
        for class in [
            TravelClass::Economy,
            TravelClass::PremiumEconomy,
            TravelClass::Business,
            TravelClass::First,
        ] {
            assert_eq!(class.to_string().parse::<TravelClass>().unwrap(), class);
        }
    }

    #[test]
    fn travel_class_provider_codes() {
        assert_eq!(TravelClass::Economy.cabin_letter(), "Y");
        assert_eq!(TravelClass::PremiumEconomy.cabin_letter(), "W");
        assert_eq!(TravelClass::Business.cabin_digit(), "3");
        assert_eq!(TravelClass::First.cabin_digit(), "4");
    }

    #[test]
    fn travel_class_default_is_economy() {
        assert_eq!(TravelClass::default(), TravelClass::Economy);
    }

    #[test]
    fn buckets_cover_the_day() {
        assert_eq!(TimeOfDay::of_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::of_hour(5), TimeOfDay::Night);
        assert_eq!(TimeOfDay::of_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::of_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::of_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::of_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::of_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::of_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn bucket_bounds_are_half_open() {
        assert!(TimeOfDay::Night.contains_hour(0));
        assert!(!TimeOfDay::Night.contains_hour(6));
        assert!(TimeOfDay::Evening.contains_hour(23));
    }

    #[test]
    fn time_of_day_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TimeOfDay::Afternoon).unwrap(),
            "\"afternoon\""
        );
    }
}
