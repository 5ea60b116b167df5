//! # Flight Offer Entities
//!
//! Canonical offer shape shared by all provider adapters.
//!
//! A [`FlightOffer`] is one priced, bookable option; it contains one
//! [`Itinerary`] per direction of travel, each made of one or more
//! [`Segment`]s (one physical leg each). The [`CarrierDictionary`]
//! accumulates code-to-name lookups across an offer set.
//!
//! All of these are created fresh per aggregation call from upstream
//! responses and never mutated afterwards; a new search discards them.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    FlightDuration, LocationCode, Money, OfferId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One end of a flight segment: where and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    /// Airport or metropolitan-area code.
    iata_code: LocationCode,
    /// Local departure or arrival moment.
    at: Timestamp,
}

impl FlightEndpoint {
    /// Creates a new endpoint.
    #[must_use]
    pub fn new(iata_code: LocationCode, at: Timestamp) -> Self {
        Self { iata_code, at }
    }

    /// Returns the location code.
    #[inline]
    #[must_use]
    pub fn iata_code(&self) -> &LocationCode {
        &self.iata_code
    }

    /// Returns the moment of departure or arrival.
    #[inline]
    #[must_use]
    pub fn at(&self) -> Timestamp {
        self.at
    }
}

/// One non-stop physical flight leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    departure: FlightEndpoint,
    arrival: FlightEndpoint,
    carrier_code: String,
    #[serde(rename = "number")]
    flight_number: String,
    duration: FlightDuration,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(
        departure: FlightEndpoint,
        arrival: FlightEndpoint,
        carrier_code: impl Into<String>,
        flight_number: impl Into<String>,
        duration: FlightDuration,
    ) -> Self {
        Self {
            departure,
            arrival,
            carrier_code: carrier_code.into(),
            flight_number: flight_number.into(),
            duration,
        }
    }

    /// Returns the departure endpoint.
    #[inline]
    #[must_use]
    pub fn departure(&self) -> &FlightEndpoint {
        &self.departure
    }

    /// Returns the arrival endpoint.
    #[inline]
    #[must_use]
    pub fn arrival(&self) -> &FlightEndpoint {
        &self.arrival
    }

    /// Returns the operating airline code.
    #[inline]
    #[must_use]
    pub fn carrier_code(&self) -> &str {
        &self.carrier_code
    }

    /// Returns the flight number.
    #[inline]
    #[must_use]
    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    /// Returns the leg duration.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> FlightDuration {
        self.duration
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}",
            self.carrier_code,
            self.flight_number,
            self.departure.iata_code(),
            self.arrival.iata_code()
        )
    }
}

/// One directional trip within an offer (outbound or return).
///
/// # Invariants
///
/// - At least one segment
/// - `segments.len() - 1` is the number of stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    duration: FlightDuration,
    segments: Vec<Segment>,
}

impl Itinerary {
    /// Creates a new itinerary.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyItinerary`] if no segments are given.
    pub fn new(duration: FlightDuration, segments: Vec<Segment>) -> DomainResult<Self> {
        if segments.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }
        Ok(Self { duration, segments })
    }

    /// Returns the total duration of the itinerary.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> FlightDuration {
        self.duration
    }

    /// Returns the segments in travel order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of stops (segments minus one).
    #[inline]
    #[must_use]
    pub fn stops(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Returns the first segment.
    #[must_use]
    pub fn first_segment(&self) -> &Segment {
        // Invariant: constructor rejects empty segment lists.
        #[allow(clippy::unwrap_used)]
        let segment = self.segments.first().unwrap();
        segment
    }
}

/// One priced, bookable flight option.
///
/// Offers are immutable once constructed; the aggregation layer only
/// reorders whole offers, never their contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    id: OfferId,
    price: Money,
    itineraries: Vec<Itinerary>,
    /// Opaque provider token needed to fetch matching return options.
    /// Only present on outbound-only offers from two-phase providers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    continuation_token: Option<String>,
}

impl FlightOffer {
    /// Creates a new offer.
    #[must_use]
    pub fn new(id: OfferId, price: Money, itineraries: Vec<Itinerary>) -> Self {
        Self {
            id,
            price,
            itineraries,
            continuation_token: None,
        }
    }

    /// Attaches a continuation token for two-phase return fetching.
    #[must_use]
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Returns the offer id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &OfferId {
        &self.id
    }

    /// Returns the total price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> &Money {
        &self.price
    }

    /// Returns the itineraries; index 0 is outbound, index 1 the return
    /// leg when present.
    #[inline]
    #[must_use]
    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    /// Returns the continuation token, if any.
    #[inline]
    #[must_use]
    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    /// Returns the worst stop count across all itineraries.
    #[must_use]
    pub fn max_stops(&self) -> usize {
        self.itineraries.iter().map(Itinerary::stops).max().unwrap_or(0)
    }

    /// Returns the departure time of the first segment of the first
    /// itinerary, when the offer has one.
    #[must_use]
    pub fn first_departure(&self) -> Option<Timestamp> {
        self.itineraries
            .first()
            .map(|itinerary| itinerary.first_segment().departure().at())
    }

    /// Returns true if any segment across all itineraries is operated by
    /// the given carrier.
    #[must_use]
    pub fn has_carrier(&self, carrier_code: &str) -> bool {
        self.itineraries.iter().any(|itinerary| {
            itinerary
                .segments()
                .iter()
                .any(|segment| segment.carrier_code() == carrier_code)
        })
    }

    /// Combines this outbound-only offer with a chosen return option.
    ///
    /// Itineraries are concatenated and prices summed; the combined offer
    /// keeps this offer's id and drops the continuation token.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CurrencyMismatch`] when the two offers are
    /// priced in different currencies.
    pub fn merge_return_leg(&self, return_offer: &FlightOffer) -> DomainResult<FlightOffer> {
        let price = self.price.checked_add(&return_offer.price)?;
        let mut itineraries = self.itineraries.clone();
        itineraries.extend(return_offer.itineraries.iter().cloned());
        Ok(FlightOffer {
            id: self.id.clone(),
            price,
            itineraries,
            continuation_token: None,
        })
    }
}

impl fmt::Display for FlightOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlightOffer({}, {}, {} itinerary(ies))",
            self.id,
            self.price,
            self.itineraries.len()
        )
    }
}

/// Airline code-to-name lookup accumulated across an offer set.
///
/// Merging is first-write-wins: a name already present is never
/// overwritten by a later provider's entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarrierDictionary(BTreeMap<String, String>);

impl CarrierDictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a carrier name unless the code is already known.
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.0.entry(code.into()).or_insert_with(|| name.into());
    }

    /// Returns the display name for a carrier code.
    #[must_use]
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// Merges another dictionary in, keeping existing entries.
    pub fn merge(&mut self, other: &CarrierDictionary) {
        for (code, name) in &other.0 {
            self.insert(code.clone(), name.clone());
        }
    }

    /// Returns the number of known carriers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no carriers are known.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for CarrierDictionary {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut dictionary = Self::new();
        for (code, name) in iter {
            dictionary.insert(code, name);
        }
        dictionary
    }
}
