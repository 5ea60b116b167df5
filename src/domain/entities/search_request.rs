//! # Search Request
//!
//! Immutable input to the aggregation core.
//!
//! A [`SearchRequest`] is constructed once per user search action through
//! [`SearchRequestBuilder`], which enforces the caller-side invariants
//! (passenger counts, date ordering). The core itself treats the request
//! as read-only and never re-validates it.
//!
//! # Examples
//!
//! ```
//! use fareflow::domain::entities::search_request::SearchRequest;
//! use fareflow::domain::value_objects::{LocationCode, TravelClass};
//! use chrono::NaiveDate;
//!
//! let request = SearchRequest::builder(
//!     LocationCode::new("GRU").unwrap(),
//!     LocationCode::new("LIS").unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//! )
//! .adults(2)
//! .travel_class(TravelClass::Business)
//! .build()
//! .unwrap();
//!
//! assert!(!request.is_round_trip());
//! assert_eq!(request.seated_passengers(), 2);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{LocationCode, TravelClass};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default provider-side cap hint for result counts.
const DEFAULT_MAX_RESULTS: u32 = 10;

/// Canonical flight search request.
///
/// # Invariants
///
/// - `adults >= 1`
/// - `return_date`, when present, does not precede `departure_date`
/// - `infants <= adults` (one lap infant per adult)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    origin: LocationCode,
    destination: LocationCode,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    adults: u32,
    children: u32,
    infants: u32,
    travel_class: TravelClass,
    max_results: u32,
}

impl SearchRequest {
    /// Starts building a request for the given route and departure date.
    #[must_use]
    pub fn builder(
        origin: LocationCode,
        destination: LocationCode,
        departure_date: NaiveDate,
    ) -> SearchRequestBuilder {
        SearchRequestBuilder {
            origin,
            destination,
            departure_date,
            return_date: None,
            adults: 1,
            children: 0,
            infants: 0,
            travel_class: TravelClass::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Returns the origin location code.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &LocationCode {
        &self.origin
    }

    /// Returns the destination location code.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &LocationCode {
        &self.destination
    }

    /// Returns the departure date.
    #[inline]
    #[must_use]
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    /// Returns the return date, if this is a round trip.
    #[inline]
    #[must_use]
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// Returns the number of adult passengers.
    #[inline]
    #[must_use]
    pub fn adults(&self) -> u32 {
        self.adults
    }

    /// Returns the number of child passengers.
    #[inline]
    #[must_use]
    pub fn children(&self) -> u32 {
        self.children
    }

    /// Returns the number of lap infants.
    #[inline]
    #[must_use]
    pub fn infants(&self) -> u32 {
        self.infants
    }

    /// Returns the requested cabin class.
    #[inline]
    #[must_use]
    pub fn travel_class(&self) -> TravelClass {
        self.travel_class
    }

    /// Returns the provider-side result cap hint.
    #[inline]
    #[must_use]
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Returns true when a return date is present.
    #[inline]
    #[must_use]
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    /// Returns the number of passengers occupying a seat.
    #[inline]
    #[must_use]
    pub fn seated_passengers(&self) -> u32 {
        self.adults + self.children
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchRequest({} -> {} on {}",
            self.origin, self.destination, self.departure_date
        )?;
        if let Some(return_date) = self.return_date {
            write!(f, ", back {}", return_date)?;
        }
        write!(f, ", {} pax, {})", self.seated_passengers(), self.travel_class)
    }
}

/// Builder for [`SearchRequest`].
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    origin: LocationCode,
    destination: LocationCode,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    adults: u32,
    children: u32,
    infants: u32,
    travel_class: TravelClass,
    max_results: u32,
}

impl SearchRequestBuilder {
    /// Sets the return date, making this a round-trip search.
    #[must_use]
    pub fn return_date(mut self, date: NaiveDate) -> Self {
        self.return_date = Some(date);
        self
    }

    /// Sets the number of adult passengers.
    #[must_use]
    pub fn adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    /// Sets the number of child passengers.
    #[must_use]
    pub fn children(mut self, children: u32) -> Self {
        self.children = children;
        self
    }

    /// Sets the number of lap infants.
    #[must_use]
    pub fn infants(mut self, infants: u32) -> Self {
        self.infants = infants;
        self
    }

    /// Sets the requested cabin class.
    #[must_use]
    pub fn travel_class(mut self, travel_class: TravelClass) -> Self {
        self.travel_class = travel_class;
        self
    }

    /// Sets the provider-side result cap hint.
    #[must_use]
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Validates the accumulated state and builds the request.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPassengerCount`] when no adult is
    /// travelling or there are more infants than adults, and
    /// [`DomainError::ReturnBeforeDeparture`] when the return date precedes
    /// the departure date.
    pub fn build(self) -> DomainResult<SearchRequest> {
        if self.adults == 0 {
            return Err(DomainError::invalid_passenger_count(
                "at least one adult is required",
            ));
        }
        if self.infants > self.adults {
            return Err(DomainError::invalid_passenger_count(format!(
                "{} infants exceed {} adults",
                self.infants, self.adults
            )));
        }
        if let Some(return_date) = self.return_date
            && return_date < self.departure_date
        {
            return Err(DomainError::ReturnBeforeDeparture {
                departure_date: self.departure_date.to_string(),
                return_date: return_date.to_string(),
            });
        }

        Ok(SearchRequest {
            origin: self.origin,
            destination: self.destination,
            departure_date: self.departure_date,
            return_date: self.return_date,
            adults: self.adults,
            children: self.children,
            infants: self.infants,
            travel_class: self.travel_class,
            max_results: self.max_results,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gru() -> LocationCode {
        LocationCode::new("GRU").unwrap()
    }

    fn lis() -> LocationCode {
        LocationCode::new("LIS").unwrap()
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn defaults() {
        let request = SearchRequest::builder(gru(), lis(), june(1)).build().unwrap();
        assert_eq!(request.adults(), 1);
        assert_eq!(request.children(), 0);
        assert_eq!(request.infants(), 0);
        assert_eq!(request.travel_class(), TravelClass::Economy);
        assert_eq!(request.max_results(), 10);
        assert!(!request.is_round_trip());
    }

    #[test]
    fn round_trip_when_return_date_set() {
        let request = SearchRequest::builder(gru(), lis(), june(1))
            .return_date(june(10))
            .build()
            .unwrap();
        assert!(request.is_round_trip());
        assert_eq!(request.return_date(), Some(june(10)));
    }

    #[test]
    fn rejects_zero_adults() {
        let result = SearchRequest::builder(gru(), lis(), june(1)).adults(0).build();
        assert!(matches!(result, Err(DomainError::InvalidPassengerCount(_))));
    }

    #[test]
    fn rejects_more_infants_than_adults() {
        let result = SearchRequest::builder(gru(), lis(), june(1))
            .adults(1)
            .infants(2)
            .build();
        assert!(matches!(result, Err(DomainError::InvalidPassengerCount(_))));
    }

    #[test]
    fn rejects_return_before_departure() {
        let result = SearchRequest::builder(gru(), lis(), june(10))
            .return_date(june(1))
            .build();
        assert!(matches!(result, Err(DomainError::ReturnBeforeDeparture { .. })));
    }

    #[test]
    fn same_day_return_is_allowed() {
        let request = SearchRequest::builder(gru(), lis(), june(1))
            .return_date(june(1))
            .build();
        assert!(request.is_ok());
    }

    #[test]
    fn display_shows_route() {
        let request = SearchRequest::builder(gru(), lis(), june(1)).build().unwrap();
        let display = request.to_string();
        assert!(display.contains("GRU"));
        assert!(display.contains("LIS"));
    }
}
