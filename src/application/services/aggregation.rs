//! # Offer Aggregation Engine
//!
//! Fans a search out to every configured provider adapter, tolerates
//! individual provider failure, and merges the partial results into one
//! price-sorted offer list.
//!
//! Aggregation is fan-out/fan-in, not a race: all adapters are dispatched
//! concurrently and the engine suspends until every one has settled. There
//! is no aggregator-level timeout; each adapter bounds itself through its
//! own HTTP timeout or poll budget. A slow provider therefore delays the
//! response but can never block it forever, and a fast success never
//! cancels a slower sibling.
//!
//! The engine's contract is total: provider failures become data
//! ([`ProviderFailure`] entries), and an all-failed or all-empty round
//! still produces a successful, empty [`AggregateResult`] — "no flights
//! found" is not an aggregation error. Abandonment is cooperative:
//! dropping the `aggregate` future drops all in-flight adapter calls.

use crate::domain::entities::offer::{CarrierDictionary, FlightOffer};
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::ProviderAdapter;
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// One provider's failure, reported as data alongside partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// The provider that failed.
    pub provider: ProviderId,
    /// The classified failure.
    pub error: ProviderError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Result of one aggregation round.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    offers: Vec<FlightOffer>,
    carriers: CarrierDictionary,
    failed_providers: Vec<ProviderFailure>,
}

impl AggregateResult {
    /// Returns the merged offers, ascending by price.
    #[inline]
    #[must_use]
    pub fn offers(&self) -> &[FlightOffer] {
        &self.offers
    }

    /// Returns the unioned carrier dictionary.
    #[inline]
    #[must_use]
    pub fn carriers(&self) -> &CarrierDictionary {
        &self.carriers
    }

    /// Returns the per-provider failures of this round.
    #[inline]
    #[must_use]
    pub fn failed_providers(&self) -> &[ProviderFailure] {
        &self.failed_providers
    }

    /// Returns true when at least one provider failed. The caller decides
    /// whether this warrants a "results may be incomplete" warning.
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failed_providers.is_empty()
    }

    /// Returns true when no offers were found.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Consumes the result into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<FlightOffer>, CarrierDictionary, Vec<ProviderFailure>) {
        (self.offers, self.carriers, self.failed_providers)
    }
}

/// Engine collecting offers from multiple provider adapters.
#[derive(Debug, Clone)]
pub struct OfferAggregator {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl OfferAggregator {
    /// Creates a new aggregator over the given adapters.
    ///
    /// Dispatch order is the adapter order; it determines which provider
    /// wins carrier-dictionary conflicts and how equal-price offers tie.
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Returns the number of configured adapters.
    #[inline]
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.adapters.len()
    }

    /// Dispatches the search to every adapter concurrently and merges the
    /// results once all have settled.
    pub async fn aggregate(&self, request: &SearchRequest) -> AggregateResult {
        let searches = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            async move {
                let provider = adapter.provider_id().clone();
                let outcome = adapter.search(request).await;
                (provider, outcome)
            }
        });

        let settled = join_all(searches).await;

        let mut offers: Vec<FlightOffer> = Vec::new();
        let mut carriers = CarrierDictionary::new();
        let mut failed_providers = Vec::new();

        for (provider, outcome) in settled {
            match outcome {
                Ok(provider_offers) => {
                    offers.extend(provider_offers.offers);
                    carriers.merge(&provider_offers.carriers);
                }
                Err(error) => {
                    warn!(%provider, %error, "provider failed, continuing with partial results");
                    failed_providers.push(ProviderFailure { provider, error });
                }
            }
        }

        // Stable: equal-price offers keep their dispatch-order position.
        offers.sort_by(|a, b| a.price().total().cmp(&b.price().total()));

        info!(
            offers = offers.len(),
            carriers = carriers.len(),
            failed = failed_providers.len(),
            "aggregation complete"
        );

        AggregateResult {
            offers,
            carriers,
            failed_providers,
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
    use crate::infrastructure::providers::error::ProviderResult;
    use crate::infrastructure::providers::traits::ProviderOffers;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct MockAdapter {
        provider_id: ProviderId,
        outcome: ProviderResult<ProviderOffers>,
    }

    impl MockAdapter {
        fn succeeding(name: &str, prices: &[&str]) -> Self {
            let offers = prices
                .iter()
                .enumerate()
                .map(|(i, price)| test_offer(&format!("{name}-{i}"), price))
                .collect();
            Self {
                provider_id: ProviderId::new(name),
                outcome: Ok(ProviderOffers::new(offers, CarrierDictionary::new())),
            }
        }

        fn with_carriers(name: &str, pairs: &[(&str, &str)]) -> Self {
            let carriers = pairs
                .iter()
                .map(|(code, label)| (code.to_string(), label.to_string()))
                .collect();
            Self {
                provider_id: ProviderId::new(name),
                outcome: Ok(ProviderOffers::new(vec![], carriers)),
            }
        }

        fn empty(name: &str) -> Self {
            Self {
                provider_id: ProviderId::new(name),
                outcome: Ok(ProviderOffers::empty()),
            }
        }

        fn failing(name: &str, error: ProviderError) -> Self {
            Self {
                provider_id: ProviderId::new(name),
                outcome: Err(error),
            }
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn provider_id(&self) -> &ProviderId {
            &self.provider_id
        }

        async fn search(&self, _request: &SearchRequest) -> ProviderResult<ProviderOffers> {
            self.outcome.clone()
        }
    }

    fn test_offer(id: &str, price: &str) -> FlightOffer {
        let segment = Segment::new(
            FlightEndpoint::new(
                LocationCode::new("GRU").unwrap(),
                Timestamp::parse_flexible("2025-06-01T08:00:00Z").unwrap(),
            ),
            FlightEndpoint::new(
                LocationCode::new("LIS").unwrap(),
                Timestamp::parse_flexible("2025-06-01T18:00:00Z").unwrap(),
            ),
            "TP",
            "82",
            FlightDuration::from_minutes(600),
        );
        FlightOffer::new(
            OfferId::new(id),
            Money::parse(price, CurrencyCode::new("EUR").unwrap()).unwrap(),
            vec![Itinerary::new(FlightDuration::from_minutes(600), vec![segment]).unwrap()],
        )
    }

    fn request() -> SearchRequest {
        SearchRequest::builder(
            LocationCode::new("GRU").unwrap(),
            LocationCode::new("LIS").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .build()
        .unwrap()
    }

    fn aggregator(adapters: Vec<MockAdapter>) -> OfferAggregator {
        OfferAggregator::new(
            adapters
                .into_iter()
                .map(|a| Arc::new(a) as Arc<dyn ProviderAdapter>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn merges_and_sorts_across_providers() {
        // One provider returns [320.00, 280.50], a second [300.00], a
        // third fails with a 500.
        let result = aggregator(vec![
            MockAdapter::succeeding("alpha", &["320.00", "280.50"]),
            MockAdapter::succeeding("beta", &["300.00"]),
            MockAdapter::failing("gamma", ProviderError::upstream_http(500, "boom")),
        ])
        .aggregate(&request())
        .await;

        let prices: Vec<String> = result
            .offers()
            .iter()
            .map(|o| o.price().total().to_string())
            .collect();
        assert_eq!(prices, vec!["280.50", "300.00", "320.00"]);
        assert_eq!(result.failed_providers().len(), 1);
        assert_eq!(result.failed_providers()[0].error.status(), Some(500));
        assert!(result.is_partial());
    }

    #[tokio::test]
    async fn empty_provider_is_not_a_failure() {
        let result = aggregator(vec![MockAdapter::empty("alpha")])
            .aggregate(&request())
            .await;

        assert!(result.is_empty());
        assert!(result.failed_providers().is_empty());
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn all_failing_still_returns_success() {
        let result = aggregator(vec![
            MockAdapter::failing("alpha", ProviderError::timeout("poll budget")),
            MockAdapter::failing("beta", ProviderError::auth_failure("bad key")),
        ])
        .aggregate(&request())
        .await;

        assert!(result.is_empty());
        assert_eq!(result.failed_providers().len(), 2);
    }

    #[tokio::test]
    async fn sort_is_stable_for_equal_prices() {
        let result = aggregator(vec![
            MockAdapter::succeeding("alpha", &["100.00"]),
            MockAdapter::succeeding("beta", &["100.00"]),
        ])
        .aggregate(&request())
        .await;

        let ids: Vec<&str> = result.offers().iter().map(|o| o.id().as_str()).collect();
        assert_eq!(ids, vec!["alpha-0", "beta-0"]);
    }

    #[tokio::test]
    async fn carrier_merge_is_first_write_wins_in_dispatch_order() {
        let result = aggregator(vec![
            MockAdapter::with_carriers("alpha", &[("XX", "Alpha Airways")]),
            MockAdapter::with_carriers("beta", &[("XX", "Beta Airlines"), ("YY", "Wide Air")]),
        ])
        .aggregate(&request())
        .await;

        assert_eq!(result.carriers().name_of("XX"), Some("Alpha Airways"));
        assert_eq!(result.carriers().name_of("YY"), Some("Wide Air"));
    }

    #[tokio::test]
    async fn no_adapters_yields_empty_result() {
        let result = aggregator(vec![]).aggregate(&request()).await;
        assert!(result.is_empty());
        assert!(!result.is_partial());
    }
}
