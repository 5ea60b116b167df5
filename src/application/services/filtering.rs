//! # Filter Evaluator
//!
//! Pure, client-side narrowing of an aggregated offer set.
//!
//! [`apply_filters`] evaluates each offer independently against a
//! [`FilterState`]; dimensions combine with AND semantics, and an
//! unconstrained dimension imposes no restriction. Filtering never mutates
//! the input and preserves relative order, so applying the same state
//! twice is a no-op.
//!
//! [`FilterFacets`] derives the values a filter UI needs (price bounds,
//! carrier codes) from the current offer set.

use crate::domain::entities::offer::FlightOffer;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::TimeOfDay;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound, inclusive.
    pub min: Decimal,
    /// Upper bound, inclusive.
    pub max: Decimal,
}

impl PriceRange {
    /// Creates a new range.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] when `min` exceeds `max`.
    pub fn new(min: Decimal, max: Decimal) -> DomainResult<Self> {
        if min > max {
            return Err(DomainError::invalid_amount(format!(
                "price range min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns true if the amount falls within the range, bounds included.
    #[inline]
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// User-selected narrowing criteria over a result set.
///
/// The default state is fully unrestricted and leaves any offer list
/// unchanged. State is mutated incrementally by user interaction and
/// re-evaluated against the current offers on every change; it does not
/// outlive the result set it filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Inclusive price window; `None` is unrestricted.
    pub price_range: Option<PriceRange>,
    /// Selected carrier codes; empty is unrestricted.
    pub carriers: HashSet<String>,
    /// Maximum stops per itinerary; `None` is unrestricted.
    pub max_stops: Option<usize>,
    /// Selected departure time buckets; empty is unrestricted.
    pub departure_buckets: HashSet<TimeOfDay>,
}

impl FilterState {
    /// Creates an unrestricted state.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Sets the price window.
    #[must_use]
    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Adds a carrier to the selected set.
    #[must_use]
    pub fn with_carrier(mut self, code: impl Into<String>) -> Self {
        self.carriers.insert(code.into());
        self
    }

    /// Caps the number of stops.
    #[must_use]
    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = Some(max_stops);
        self
    }

    /// Adds a departure time bucket to the selected set.
    #[must_use]
    pub fn with_departure_bucket(mut self, bucket: TimeOfDay) -> Self {
        self.departure_buckets.insert(bucket);
        self
    }

    /// Returns true when no dimension is constrained.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.price_range.is_none()
            && self.carriers.is_empty()
            && self.max_stops.is_none()
            && self.departure_buckets.is_empty()
    }

    /// Evaluates this state against one offer. Dimensions AND together;
    /// within the carrier and time dimensions any selected value matching
    /// is enough.
    #[must_use]
    pub fn matches(&self, offer: &FlightOffer) -> bool {
        if let Some(range) = &self.price_range
            && !range.contains(offer.price().total())
        {
            return false;
        }

        if !self.carriers.is_empty()
            && !self.carriers.iter().any(|code| offer.has_carrier(code))
        {
            return false;
        }

        if let Some(max_stops) = self.max_stops
            && offer.max_stops() > max_stops
        {
            return false;
        }

        if !self.departure_buckets.is_empty() {
            let Some(departure) = offer.first_departure() else {
                return false;
            };
            if !self
                .departure_buckets
                .iter()
                .any(|bucket| bucket.contains_hour(departure.hour()))
            {
                return false;
            }
        }

        true
    }
}

/// Applies the filter state to an offer list.
///
/// Returns a new list preserving relative order; the input is untouched.
#[must_use]
pub fn apply_filters(offers: &[FlightOffer], filters: &FilterState) -> Vec<FlightOffer> {
    offers
        .iter()
        .filter(|offer| filters.matches(offer))
        .cloned()
        .collect()
}

/// Values a filter UI derives from the current offer set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterFacets {
    /// Cheapest offer total, when any offer exists.
    pub min_price: Option<Decimal>,
    /// Most expensive offer total, when any offer exists.
    pub max_price: Option<Decimal>,
    /// Distinct carrier codes across all offers, sorted.
    pub carrier_codes: Vec<String>,
}

impl FilterFacets {
    /// Derives facets from an offer set.
    #[must_use]
    pub fn from_offers(offers: &[FlightOffer]) -> Self {
        let mut min_price = None;
        let mut max_price = None;
        let mut carrier_codes: Vec<String> = Vec::new();

        for offer in offers {
            let total = offer.price().total();
            min_price = Some(min_price.map_or(total, |m: Decimal| m.min(total)));
            max_price = Some(max_price.map_or(total, |m: Decimal| m.max(total)));
            for itinerary in offer.itineraries() {
                for segment in itinerary.segments() {
                    if !carrier_codes.iter().any(|c| c == segment.carrier_code()) {
                        carrier_codes.push(segment.carrier_code().to_string());
                    }
                }
            }
        }

        carrier_codes.sort();
        Self {
            min_price,
            max_price,
            carrier_codes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::offer::{FlightEndpoint, Itinerary, Segment};
    use crate::domain::value_objects::{
        CurrencyCode, FlightDuration, LocationCode, Money, OfferId, Timestamp,
    };

    fn segment(carrier: &str, from: &str, to: &str, departs_at: &str) -> Segment {
        Segment::new(
            FlightEndpoint::new(
                LocationCode::new(from).unwrap(),
                Timestamp::parse_flexible(departs_at).unwrap(),
            ),
            FlightEndpoint::new(
                LocationCode::new(to).unwrap(),
                Timestamp::parse_flexible("2025-06-01T23:59:00Z").unwrap(),
            ),
            carrier,
            "100",
            FlightDuration::from_minutes(120),
        )
    }

    fn offer(id: &str, price: &str, segments: Vec<Segment>) -> FlightOffer {
        FlightOffer::new(
            OfferId::new(id),
            Money::parse(price, CurrencyCode::new("EUR").unwrap()).unwrap(),
            vec![Itinerary::new(FlightDuration::from_minutes(240), segments).unwrap()],
        )
    }

    fn nonstop(id: &str, price: &str, carrier: &str, departs_at: &str) -> FlightOffer {
        offer(id, price, vec![segment(carrier, "GRU", "LIS", departs_at)])
    }

    fn one_stop(id: &str, price: &str) -> FlightOffer {
        offer(
            id,
            price,
            vec![
                segment("TP", "GRU", "MAD", "2025-06-01T08:00:00Z"),
                segment("TP", "MAD", "LIS", "2025-06-01T14:00:00Z"),
            ],
        )
    }

    fn range(min: &str, max: &str) -> PriceRange {
        PriceRange::new(min.parse().unwrap(), max.parse().unwrap()).unwrap()
    }

    #[test]
    fn price_range_rejects_inverted_bounds() {
        assert!(PriceRange::new(Decimal::TEN, Decimal::ONE).is_err());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = FilterState::unrestricted().with_price_range(range("100.00", "300.00"));
        assert!(filters.matches(&nonstop("a", "100.00", "TP", "2025-06-01T08:00:00Z")));
        assert!(filters.matches(&nonstop("b", "300.00", "TP", "2025-06-01T08:00:00Z")));
        assert!(!filters.matches(&nonstop("c", "300.01", "TP", "2025-06-01T08:00:00Z")));
    }

    #[test]
    fn carrier_filter_matches_any_segment() {
        let filters = FilterState::unrestricted().with_carrier("IB");
        let mixed = offer(
            "a",
            "200.00",
            vec![
                segment("TP", "GRU", "MAD", "2025-06-01T08:00:00Z"),
                segment("IB", "MAD", "LIS", "2025-06-01T14:00:00Z"),
            ],
        );
        assert!(filters.matches(&mixed));
        assert!(!filters.matches(&nonstop("b", "200.00", "TP", "2025-06-01T08:00:00Z")));
    }

    #[test]
    fn nonstop_filter_excludes_one_stop_regardless_of_price() {
        // A cheap one-stop offer must not survive a zero-stop cap.
        let filters = FilterState::unrestricted()
            .with_price_range(range("0", "300.00"))
            .with_max_stops(0);
        assert!(!filters.matches(&one_stop("a", "250.00")));
        assert!(filters.matches(&nonstop("b", "250.00", "TP", "2025-06-01T08:00:00Z")));
    }

    #[test]
    fn departure_bucket_uses_first_segment_of_first_itinerary() {
        let filters = FilterState::unrestricted().with_departure_bucket(TimeOfDay::Morning);
        assert!(filters.matches(&nonstop("a", "100.00", "TP", "2025-06-01T08:00:00Z")));
        assert!(!filters.matches(&nonstop("b", "100.00", "TP", "2025-06-01T20:00:00Z")));
    }

    #[test]
    fn multiple_buckets_or_together() {
        let filters = FilterState::unrestricted()
            .with_departure_bucket(TimeOfDay::Night)
            .with_departure_bucket(TimeOfDay::Evening);
        assert!(filters.matches(&nonstop("a", "100.00", "TP", "2025-06-01T02:00:00Z")));
        assert!(filters.matches(&nonstop("b", "100.00", "TP", "2025-06-01T20:00:00Z")));
        assert!(!filters.matches(&nonstop("c", "100.00", "TP", "2025-06-01T10:00:00Z")));
    }

    #[test]
    fn unrestricted_state_is_identity() {
        let offers = vec![
            nonstop("a", "300.00", "TP", "2025-06-01T08:00:00Z"),
            one_stop("b", "150.00"),
        ];
        let filtered = apply_filters(&offers, &FilterState::unrestricted());
        assert_eq!(filtered, offers);
    }

    #[test]
    fn apply_filters_is_idempotent() {
        let offers = vec![
            nonstop("a", "300.00", "TP", "2025-06-01T08:00:00Z"),
            one_stop("b", "150.00"),
            nonstop("c", "120.00", "IB", "2025-06-01T20:00:00Z"),
        ];
        let filters = FilterState::unrestricted()
            .with_price_range(range("100.00", "400.00"))
            .with_max_stops(0);

        let once = apply_filters(&offers, &filters);
        let twice = apply_filters(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn apply_filters_preserves_relative_order() {
        let offers = vec![
            nonstop("z", "300.00", "TP", "2025-06-01T08:00:00Z"),
            nonstop("a", "100.00", "TP", "2025-06-01T09:00:00Z"),
        ];
        let filtered = apply_filters(&offers, &FilterState::unrestricted());
        let ids: Vec<&str> = filtered.iter().map(|o| o.id().as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn facets_derive_bounds_and_carriers() {
        let offers = vec![
            nonstop("a", "300.00", "TP", "2025-06-01T08:00:00Z"),
            nonstop("b", "120.50", "IB", "2025-06-01T09:00:00Z"),
        ];
        let facets = FilterFacets::from_offers(&offers);
        assert_eq!(facets.min_price.unwrap().to_string(), "120.50");
        assert_eq!(facets.max_price.unwrap().to_string(), "300.00");
        assert_eq!(facets.carrier_codes, vec!["IB", "TP"]);
    }

    #[test]
    fn facets_of_empty_set_are_empty() {
        let facets = FilterFacets::from_offers(&[]);
        assert!(facets.min_price.is_none());
        assert!(facets.max_price.is_none());
        assert!(facets.carrier_codes.is_empty());
    }
}
