//! # Amadeus Provider Adapter
//!
//! Token-authenticated synchronous search (profile: client-credentials
//! exchange + one GET).
//!
//! Every `search` call performs a fresh OAuth2 client-credentials exchange
//! and issues one GET against the flight-offers endpoint. The response is
//! already close to the canonical shape; offers are re-namespaced and the
//! carrier dictionary is taken from the response `dictionaries` block.
//!
//! Failure classification: a failed token exchange is an
//! [`ProviderError::AuthFailure`] and is not retried; a non-2xx search
//! response maps by status; a malformed or empty body maps to zero offers.

use crate::domain::entities::offer::{
    CarrierDictionary, FlightEndpoint, FlightOffer, Itinerary, Segment,
};
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::value_objects::{CurrencyCode, LocationCode, Money, OfferId, ProviderId, Timestamp};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{ProviderAdapter, ProviderOffers};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Configuration for the Amadeus adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct AmadeusConfig {
    /// Base URL of the API, e.g. `https://test.api.amadeus.com`.
    pub base_url: String,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Amadeus flight-offers adapter.
#[derive(Debug)]
pub struct AmadeusAdapter {
    provider_id: ProviderId,
    http: HttpClient,
    config: AmadeusConfig,
}

impl AmadeusAdapter {
    /// Creates a new adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` if the HTTP client cannot be
    /// constructed.
    pub fn new(config: AmadeusConfig) -> ProviderResult<Self> {
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            provider_id: ProviderId::new("amadeus"),
            http,
            config,
        })
    }

    /// Exchanges client credentials for a short-lived bearer token.
    ///
    /// Tokens are deliberately re-fetched per call; caching is out of
    /// scope for this adapter.
    async fn fetch_token(&self) -> ProviderResult<String> {
        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response: TokenResponse = self
            .http
            .post_form(&url, &form)
            .await
            .map_err(|e| ProviderError::auth_failure(format!("token exchange failed: {e}")))?;

        if response.access_token.is_empty() {
            return Err(ProviderError::auth_failure("token exchange returned no token"));
        }
        Ok(response.access_token)
    }

    /// Builds the flight-offers query string from the canonical request.
    fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("originLocationCode", request.origin().to_string()),
            ("destinationLocationCode", request.destination().to_string()),
            ("departureDate", request.departure_date().to_string()),
            ("adults", request.adults().to_string()),
            ("max", request.max_results().to_string()),
        ];
        if let Some(return_date) = request.return_date() {
            params.push(("returnDate", return_date.to_string()));
        }
        if request.children() > 0 {
            params.push(("children", request.children().to_string()));
        }
        if request.infants() > 0 {
            params.push(("infants", request.infants().to_string()));
        }
        params.push(("travelClass", request.travel_class().to_string()));
        params
    }

    /// Maps the provider response into canonical offers, skipping entries
    /// that fail to convert.
    fn map_response(&self, response: SearchResponse) -> ProviderOffers {
        let mut offers = Vec::with_capacity(response.data.len());
        for (index, raw) in response.data.into_iter().enumerate() {
            match serde_json::from_value::<RawOffer>(raw) {
                Ok(raw_offer) => match self.map_offer(index, raw_offer) {
                    Ok(offer) => offers.push(offer),
                    Err(e) => {
                        warn!(provider = %self.provider_id, index, error = %e, "skipping unmappable offer");
                    }
                },
                Err(e) => {
                    warn!(provider = %self.provider_id, index, error = %e, "skipping malformed offer");
                }
            }
        }

        let carriers = response
            .dictionaries
            .carriers
            .into_iter()
            .collect::<CarrierDictionary>();
        ProviderOffers::new(offers, carriers)
    }

    /// Converts one raw offer into the canonical shape.
    fn map_offer(&self, index: usize, raw: RawOffer) -> ProviderResult<FlightOffer> {
        let currency = CurrencyCode::new(&raw.price.currency)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?;
        let price = Money::parse(&raw.price.total, currency)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?;

        let mut itineraries = Vec::with_capacity(raw.itineraries.len());
        for raw_itinerary in raw.itineraries {
            itineraries.push(map_itinerary(raw_itinerary)?);
        }

        Ok(FlightOffer::new(
            OfferId::namespaced(&self.provider_id, index),
            price,
            itineraries,
        ))
    }
}

fn map_itinerary(raw: RawItinerary) -> ProviderResult<Itinerary> {
    let duration = raw
        .duration
        .parse()
        .map_err(|e: crate::domain::errors::DomainError| {
            ProviderError::malformed_response(e.to_string())
        })?;

    let mut segments = Vec::with_capacity(raw.segments.len());
    for raw_segment in raw.segments {
        segments.push(map_segment(raw_segment)?);
    }

    Itinerary::new(duration, segments).map_err(|e| ProviderError::malformed_response(e.to_string()))
}

fn map_segment(raw: RawSegment) -> ProviderResult<Segment> {
    let duration = raw
        .duration
        .parse()
        .map_err(|e: crate::domain::errors::DomainError| {
            ProviderError::malformed_response(e.to_string())
        })?;
    Ok(Segment::new(
        map_endpoint(raw.departure)?,
        map_endpoint(raw.arrival)?,
        raw.carrier_code,
        raw.number,
        duration,
    ))
}

fn map_endpoint(raw: RawEndpoint) -> ProviderResult<FlightEndpoint> {
    let code = LocationCode::new(&raw.iata_code)
        .map_err(|e| ProviderError::malformed_response(e.to_string()))?;
    let at = Timestamp::parse_flexible(&raw.at)
        .map_err(|e| ProviderError::malformed_response(e.to_string()))?;
    Ok(FlightEndpoint::new(code, at))
}

#[async_trait]
impl ProviderAdapter for AmadeusAdapter {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    async fn search(&self, request: &SearchRequest) -> ProviderResult<ProviderOffers> {
        let token = self.fetch_token().await?;

        let url = format!("{}/v2/shopping/flight-offers", self.config.base_url);
        let params = Self::query_params(request);

        let response: SearchResponse =
            match self.http.get_json_bearer(&url, &params, &token).await {
                Ok(response) => response,
                Err(ProviderError::MalformedResponse { message }) => {
                    warn!(provider = %self.provider_id, %message, "unparseable body, treating as zero offers");
                    return Ok(ProviderOffers::empty());
                }
                Err(e) => return Err(e),
            };

        let offers = self.map_response(response);
        debug!(provider = %self.provider_id, count = offers.offers.len(), "search complete");
        Ok(offers)
    }
}

// Wire shapes. Unknown fields are ignored; missing blocks default so an
// empty body maps to zero offers.

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
    #[serde(default)]
    dictionaries: Dictionaries,
}

#[derive(Debug, Default, Deserialize)]
struct Dictionaries {
    #[serde(default)]
    carriers: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    price: RawPrice,
    itineraries: Vec<RawItinerary>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    total: String,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
    duration: String,
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    departure: RawEndpoint,
    arrival: RawEndpoint,
    #[serde(rename = "carrierCode")]
    carrier_code: String,
    #[serde(default)]
    number: String,
    duration: String,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    #[serde(rename = "iataCode")]
    iata_code: String,
    at: String,
}
