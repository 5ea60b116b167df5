//! # Round-Trip Selection Flow
//!
//! Two-phase outbound/return selection for providers that split round-trip
//! search into two calls.
//!
//! The flow is a two-state machine driven by explicit caller action:
//!
//! ```text
//! OutboundSelection --select(offer)--> ReturnSearch --combine(return)--> FlightOffer
//! ```
//!
//! [`ReturnSearch`] can only be obtained by selecting an outbound offer
//! that carries a continuation token, so "return re-fetch requires a token
//! from a previously returned offer" is enforced by construction rather
//! than by runtime flags.

use crate::domain::entities::offer::FlightOffer;
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::OfferId;
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::traits::{ProviderOffers, TwoPhaseProviderAdapter};
use thiserror::Error;

/// Error type for the selection flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The selection flow only applies to round-trip searches.
    #[error("selection flow requires a round-trip search")]
    NotRoundTrip,

    /// The selected offer id is not part of this outbound set.
    #[error("offer not found in outbound set: {0}")]
    OfferNotFound(String),

    /// The selected offer carries no continuation token, so no matching
    /// return options can be fetched for it.
    #[error("offer {0} has no continuation token")]
    MissingContinuationToken(String),

    /// Combining the chosen legs failed.
    #[error("failed to combine legs: {0}")]
    Combine(#[from] DomainError),
}

/// First phase: outbound options awaiting a caller choice.
#[derive(Debug, Clone)]
pub struct OutboundSelection {
    request: SearchRequest,
    offers: Vec<FlightOffer>,
}

impl OutboundSelection {
    /// Starts the selection flow over the outbound offers of a round-trip
    /// search.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NotRoundTrip`] when the request has no
    /// return date.
    pub fn new(request: SearchRequest, offers: Vec<FlightOffer>) -> Result<Self, SelectionError> {
        if !request.is_round_trip() {
            return Err(SelectionError::NotRoundTrip);
        }
        Ok(Self { request, offers })
    }

    /// Returns the outbound offers awaiting selection.
    #[inline]
    #[must_use]
    pub fn offers(&self) -> &[FlightOffer] {
        &self.offers
    }

    /// Returns the originating search request.
    #[inline]
    #[must_use]
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Advances to the return phase by selecting one outbound offer.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::OfferNotFound`] for an unknown id and
    /// [`SelectionError::MissingContinuationToken`] when the chosen offer
    /// cannot seed a return search.
    pub fn select(self, offer_id: &OfferId) -> Result<ReturnSearch, SelectionError> {
        let offer = self
            .offers
            .into_iter()
            .find(|offer| offer.id() == offer_id)
            .ok_or_else(|| SelectionError::OfferNotFound(offer_id.to_string()))?;

        let token = offer
            .continuation_token()
            .ok_or_else(|| SelectionError::MissingContinuationToken(offer_id.to_string()))?
            .to_string();

        Ok(ReturnSearch {
            request: self.request,
            outbound: offer,
            token,
        })
    }
}

/// Second phase: a chosen outbound offer plus the token needed to fetch
/// its matching return options.
#[derive(Debug, Clone)]
pub struct ReturnSearch {
    request: SearchRequest,
    outbound: FlightOffer,
    token: String,
}

impl ReturnSearch {
    /// Returns the chosen outbound offer.
    #[inline]
    #[must_use]
    pub fn outbound(&self) -> &FlightOffer {
        &self.outbound
    }

    /// Returns the continuation token driving the return search.
    #[inline]
    #[must_use]
    pub fn continuation_token(&self) -> &str {
        &self.token
    }

    /// Returns the originating search request.
    #[inline]
    #[must_use]
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Fetches the matching return options from the two-phase provider.
    ///
    /// # Errors
    ///
    /// Propagates the provider's classified failure.
    pub async fn fetch_options(
        &self,
        adapter: &dyn TwoPhaseProviderAdapter,
    ) -> ProviderResult<ProviderOffers> {
        adapter.search_return(&self.request, &self.token).await
    }

    /// Combines a chosen return option with the outbound offer:
    /// itineraries concatenate, prices sum.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Combine`] when the legs cannot be merged
    /// (e.g. currency mismatch).
    pub fn combine(&self, return_offer: &FlightOffer) -> Result<FlightOffer, SelectionError> {
        Ok(self.outbound.merge_return_leg(return_offer)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::offer::{FlightEndpoint, Itinerary, Segment};
    use crate::domain::value_objects::{
        CurrencyCode, FlightDuration, LocationCode, Money, Timestamp,
    };
    use chrono::NaiveDate;

    fn offer(id: &str, price: &str, from: &str, to: &str) -> FlightOffer {
        let segment = Segment::new(
            FlightEndpoint::new(
                LocationCode::new(from).unwrap(),
                Timestamp::parse_flexible("2025-06-01T08:00:00Z").unwrap(),
            ),
            FlightEndpoint::new(
                LocationCode::new(to).unwrap(),
                Timestamp::parse_flexible("2025-06-01T18:00:00Z").unwrap(),
            ),
            "TP",
            "82",
            FlightDuration::from_minutes(600),
        );
        FlightOffer::new(
            OfferId::new(id),
            Money::parse(price, CurrencyCode::new("BRL").unwrap()).unwrap(),
            vec![Itinerary::new(FlightDuration::from_minutes(600), vec![segment]).unwrap()],
        )
    }

    fn round_trip_request() -> SearchRequest {
        SearchRequest::builder(
            LocationCode::new("GRU").unwrap(),
            LocationCode::new("LIS").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .return_date(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
        .build()
        .unwrap()
    }

    fn one_way_request() -> SearchRequest {
        SearchRequest::builder(
            LocationCode::new("GRU").unwrap(),
            LocationCode::new("LIS").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn rejects_one_way_request() {
        let result = OutboundSelection::new(one_way_request(), vec![]);
        assert!(matches!(result, Err(SelectionError::NotRoundTrip)));
    }

    #[test]
    fn select_requires_known_offer() {
        let selection = OutboundSelection::new(round_trip_request(), vec![]).unwrap();
        let result = selection.select(&OfferId::new("missing"));
        assert!(matches!(result, Err(SelectionError::OfferNotFound(_))));
    }

    #[test]
    fn select_requires_continuation_token() {
        let offers = vec![offer("serpapi-0", "1200.00", "GRU", "LIS")];
        let selection = OutboundSelection::new(round_trip_request(), offers).unwrap();
        let result = selection.select(&OfferId::new("serpapi-0"));
        assert!(matches!(
            result,
            Err(SelectionError::MissingContinuationToken(_))
        ));
    }

    #[test]
    fn select_advances_to_return_phase() {
        let offers =
            vec![offer("serpapi-0", "1200.00", "GRU", "LIS").with_continuation_token("tok-1")];
        let selection = OutboundSelection::new(round_trip_request(), offers).unwrap();

        let return_search = selection.select(&OfferId::new("serpapi-0")).unwrap();
        assert_eq!(return_search.continuation_token(), "tok-1");
        assert_eq!(return_search.outbound().id().as_str(), "serpapi-0");
    }

    #[test]
    fn combine_sums_prices_and_concatenates_itineraries() {
        let offers =
            vec![offer("serpapi-0", "1200.00", "GRU", "LIS").with_continuation_token("tok-1")];
        let selection = OutboundSelection::new(round_trip_request(), offers).unwrap();
        let return_search = selection.select(&OfferId::new("serpapi-0")).unwrap();

        let return_offer = offer("serpapi-return-0", "950.50", "LIS", "GRU");
        let combined = return_search.combine(&return_offer).unwrap();

        assert_eq!(combined.price().total().to_string(), "2150.50");
        assert_eq!(combined.itineraries().len(), 2);
        assert!(combined.continuation_token().is_none());
    }
}
