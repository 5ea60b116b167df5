//! # Provider Adapter Trait
//!
//! Port definition for upstream flight-search integrations.
//!
//! This module defines the [`ProviderAdapter`] trait that all provider
//! integrations implement. Each adapter independently owns its upstream
//! authentication, request shaping, response-to-canonical mapping and
//! error classification; the aggregation layer sees only this uniform
//! surface.
//!
//! # Examples
//!
//! ```ignore
//! use fareflow::infrastructure::providers::traits::{ProviderAdapter, ProviderOffers};
//! use fareflow::infrastructure::providers::error::ProviderResult;
//!
//! #[derive(Debug)]
//! struct MyAdapter { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl ProviderAdapter for MyAdapter {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::offer::{CarrierDictionary, FlightOffer};
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use std::fmt;

/// Successful outcome of one provider search call.
///
/// Zero offers with an empty dictionary is a valid, common outcome and is
/// not an error.
#[derive(Debug, Clone, Default)]
pub struct ProviderOffers {
    /// Canonical offers produced from the provider response.
    pub offers: Vec<FlightOffer>,
    /// Carrier names referenced by those offers.
    pub carriers: CarrierDictionary,
}

impl ProviderOffers {
    /// Creates a new result set.
    #[must_use]
    pub fn new(offers: Vec<FlightOffer>, carriers: CarrierDictionary) -> Self {
        Self { offers, carriers }
    }

    /// Creates an empty result set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the provider produced no offers.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

/// Trait defining the interface for provider adapters.
///
/// # Error Handling
///
/// `search` returns `ProviderResult<ProviderOffers>`. Implementations map
/// every provider-specific failure into a typed
/// [`ProviderError`](crate::infrastructure::providers::error::ProviderError)
/// variant; nothing escapes untyped. Malformed or empty bodies map to zero
/// offers with a logged warning, not to an error.
///
/// # Concurrency
///
/// Each `search` call is one self-contained request/response round trip
/// (or submit/poll loop) with no cross-call state; adapters carry no
/// implicit session. The only cross-call value is a continuation token,
/// held and passed back by the caller explicitly.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + fmt::Debug {
    /// Returns the provider id used for namespacing and reporting.
    fn provider_id(&self) -> &ProviderId;

    /// Searches for offers matching the canonical request.
    ///
    /// # Errors
    ///
    /// - `ProviderError::AuthFailure` - credentials or signature rejected
    /// - `ProviderError::UpstreamHttp` - non-2xx response to the search
    /// - `ProviderError::Network` - transport-level failure
    /// - `ProviderError::Timeout` - poll budget exhausted empty-handed
    async fn search(&self, request: &SearchRequest) -> ProviderResult<ProviderOffers>;
}

/// Extension for providers that split round trips into two calls.
///
/// The initial [`ProviderAdapter::search`] returns outbound options, each
/// carrying a continuation token; the matching return options for one
/// chosen outbound offer come from `search_return`, invoked only on
/// explicit caller selection.
#[async_trait]
pub trait TwoPhaseProviderAdapter: ProviderAdapter {
    /// Fetches return options matching a previously returned outbound
    /// offer's continuation token.
    ///
    /// # Errors
    ///
    /// Same classification as [`ProviderAdapter::search`].
    async fn search_return(
        &self,
        request: &SearchRequest,
        continuation_token: &str,
    ) -> ProviderResult<ProviderOffers>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_set() {
        let offers = ProviderOffers::empty();
        assert!(offers.is_empty());
        assert!(offers.carriers.is_empty());
    }
}
