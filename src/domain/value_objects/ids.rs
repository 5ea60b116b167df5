//! # Identifier Types
//!
//! String-backed identifiers for providers and offers.
//!
//! Offer identifiers are namespaced by the provider that produced them
//! (e.g. `serpapi-3`) so ids stay unique within one aggregation response
//! even when providers hand out overlapping raw indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an upstream flight-search provider.
///
/// # Examples
///
/// ```
/// use fareflow::domain::value_objects::ids::ProviderId;
///
/// let id = ProviderId::new("serpapi");
/// assert_eq!(id.as_str(), "serpapi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a new provider id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier for a flight offer, unique within one aggregation response.
///
/// # Examples
///
/// ```
/// use fareflow::domain::value_objects::ids::{OfferId, ProviderId};
///
/// let id = OfferId::namespaced(&ProviderId::new("amadeus"), 3);
/// assert_eq!(id.as_str(), "amadeus-3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    /// Creates an offer id from a raw string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates an offer id namespaced by the producing provider.
    #[must_use]
    pub fn namespaced(provider: &ProviderId, index: usize) -> Self {
        Self(format!("{}-{}", provider, index))
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
