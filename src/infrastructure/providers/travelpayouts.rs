//! # Travelpayouts Provider Adapter
//!
//! Signed asynchronous job search (profile: job submission + polling).
//!
//! A search is submitted as a job carrying an MD5 request signature; the
//! provider answers with a job `uuid`, and results are collected by
//! polling a results endpoint at a fixed interval until the response
//! carries an explicit search-completed marker or the attempt budget runs
//! out. Every partial page received along the way is aggregated into the
//! final result; a poll transport failure ends polling early and returns
//! whatever was accumulated.
//!
//! The signature field order and hash algorithm are contractual with the
//! provider: any deviation silently rejects every call. Both live in
//! [`signature_payload`] and [`sign`], pinned byte-for-byte by unit tests.
//!
//! Prices arrive in RUB and are converted to EUR with a fixed,
//! configuration-supplied approximate rate; this is an accepted
//! simplification, not a live FX lookup.

use crate::domain::entities::offer::{
    CarrierDictionary, FlightEndpoint, FlightOffer, Itinerary, Segment,
};
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::value_objects::{
    CurrencyCode, FlightDuration, LocationCode, Money, OfferId, ProviderId, Timestamp,
};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{ProviderAdapter, ProviderOffers};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Currency the converted prices are reported in.
const TARGET_CURRENCY: &str = "EUR";

/// Configuration for the Travelpayouts adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelpayoutsConfig {
    /// Base URL of the API, e.g. `https://api.travelpayouts.com`.
    pub base_url: String,
    /// API access token; first signature field and poll auth header.
    pub api_token: String,
    /// Partner marker.
    pub marker: String,
    /// Host identifier sent with job submissions.
    pub host: String,
    /// Caller IP included in the signature.
    #[serde(default = "default_user_ip")]
    pub user_ip: String,
    /// Approximate RUB to EUR conversion rate applied to prices.
    #[serde(default = "default_rub_to_eur_rate")]
    pub rub_to_eur_rate: Decimal,
    /// Delay between result polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of result polls per search.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_user_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_rub_to_eur_rate() -> Decimal {
    Decimal::new(1, 2)
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// One direction of travel in a job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Direction {
    /// Origin location code.
    pub origin: String,
    /// Destination location code.
    pub destination: String,
    /// Travel date, `YYYY-MM-DD`.
    pub date: String,
}

/// Builds the signature payload string.
///
/// The field order is contractual: token, marker, the three passenger
/// counts, each direction as `date:origin:destination`, the cabin letter
/// and the caller IP, all colon-joined.
#[must_use]
pub fn signature_payload(
    token: &str,
    marker: &str,
    adults: u32,
    children: u32,
    infants: u32,
    directions: &[Direction],
    cabin: &str,
    user_ip: &str,
) -> String {
    let mut parts: Vec<String> = vec![
        token.to_string(),
        marker.to_string(),
        adults.to_string(),
        children.to_string(),
        infants.to_string(),
    ];
    for direction in directions {
        parts.push(format!(
            "{}:{}:{}",
            direction.date, direction.origin, direction.destination
        ));
    }
    parts.push(cabin.to_string());
    parts.push(user_ip.to_string());
    parts.join(":")
}

/// Returns the lowercase hex MD5 digest of the given payload.
#[must_use]
pub fn md5_hex(payload: &str) -> String {
    format!("{:x}", md5::compute(payload.as_bytes()))
}

/// Computes the request signature for a job submission.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn sign(
    token: &str,
    marker: &str,
    adults: u32,
    children: u32,
    infants: u32,
    directions: &[Direction],
    cabin: &str,
    user_ip: &str,
) -> String {
    md5_hex(&signature_payload(
        token, marker, adults, children, infants, directions, cabin, user_ip,
    ))
}

/// Travelpayouts flight-search adapter.
#[derive(Debug)]
pub struct TravelpayoutsAdapter {
    provider_id: ProviderId,
    http: HttpClient,
    config: TravelpayoutsConfig,
}

impl TravelpayoutsAdapter {
    /// Creates a new adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` if the HTTP client cannot be
    /// constructed.
    pub fn new(config: TravelpayoutsConfig) -> ProviderResult<Self> {
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            provider_id: ProviderId::new("travelpayouts"),
            http,
            config,
        })
    }

    /// Builds the directions list: outbound, plus the mirrored return
    /// direction for round trips.
    fn directions(request: &SearchRequest) -> Vec<Direction> {
        let mut directions = vec![Direction {
            origin: request.origin().to_string(),
            destination: request.destination().to_string(),
            date: request.departure_date().to_string(),
        }];
        if let Some(return_date) = request.return_date() {
            directions.push(Direction {
                origin: request.destination().to_string(),
                destination: request.origin().to_string(),
                date: return_date.to_string(),
            });
        }
        directions
    }

    /// Submits the search job and returns the provider job id.
    async fn submit_job(&self, request: &SearchRequest) -> ProviderResult<String> {
        let directions = Self::directions(request);
        let cabin = request.travel_class().cabin_letter();
        let signature = sign(
            &self.config.api_token,
            &self.config.marker,
            request.adults(),
            request.children(),
            request.infants(),
            &directions,
            cabin,
            &self.config.user_ip,
        );

        let body = SubmitBody {
            host: self.config.host.clone(),
            marker: self.config.marker.clone(),
            user_ip: self.config.user_ip.clone(),
            signature,
            search_params: SubmitSearchParams {
                trip_class: cabin.to_string(),
                passengers: SubmitPassengers {
                    adults: request.adults(),
                    children: request.children(),
                    infants: request.infants(),
                },
                directions,
            },
        };

        let url = format!("{}/v1/flight_search", self.config.base_url);
        let response: SubmitResponse = self
            .http
            .post_json(&url, &body, ("X-Access-Token", self.config.api_token.as_str()))
            .await?;

        match response.uuid {
            Some(uuid) if !uuid.is_empty() => Ok(uuid),
            _ => Err(ProviderError::malformed_response(
                "job submission returned no uuid",
            )),
        }
    }

    /// Polls the results endpoint until completion or budget exhaustion,
    /// aggregating every page received.
    async fn poll_results(&self, uuid: &str) -> ProviderResult<Vec<RawChunk>> {
        let url = format!("{}/v1/flight_search_results", self.config.base_url);
        let params = [("uuid", uuid)];
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        let mut accumulated: Vec<RawChunk> = Vec::new();
        let mut completed = false;
        let mut aborted = false;

        for attempt in 1..=self.config.max_poll_attempts {
            tokio::time::sleep(interval).await;

            let chunks: Vec<RawChunk> = match self
                .http
                .get_json_with_header(&url, &params, ("X-Access-Token", self.config.api_token.as_str()))
                .await
            {
                Ok(chunks) => chunks,
                Err(e) => {
                    // Transport failure ends polling early; keep what we
                    // already have.
                    warn!(provider = %self.provider_id, attempt, error = %e, "poll failed, stopping early");
                    aborted = true;
                    break;
                }
            };

            for chunk in chunks {
                if chunk.search_completed {
                    completed = true;
                }
                if !chunk.proposals.is_empty() {
                    accumulated.push(chunk);
                }
            }

            debug!(provider = %self.provider_id, attempt, pages = accumulated.len(), completed, "poll round");
            if completed {
                break;
            }
        }

        if accumulated.is_empty() && !completed && !aborted {
            return Err(ProviderError::timeout(format!(
                "no results after {} polls",
                self.config.max_poll_attempts
            )));
        }
        Ok(accumulated)
    }

    /// Maps accumulated pages into canonical offers, converting prices
    /// into the target currency.
    fn map_chunks(&self, uuid: &str, chunks: Vec<RawChunk>) -> ProviderOffers {
        let currency = match CurrencyCode::new(TARGET_CURRENCY) {
            Ok(currency) => currency,
            Err(_) => return ProviderOffers::empty(),
        };

        let mut offers = Vec::with_capacity(chunks.len());
        let mut carriers = CarrierDictionary::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            match self.map_chunk(uuid, index, &chunk, &currency, &mut carriers) {
                Ok(offer) => offers.push(offer),
                Err(e) => {
                    warn!(provider = %self.provider_id, index, error = %e, "skipping unmappable result");
                }
            }
        }

        ProviderOffers::new(offers, carriers)
    }

    fn map_chunk(
        &self,
        uuid: &str,
        index: usize,
        chunk: &RawChunk,
        currency: &CurrencyCode,
        carriers: &mut CarrierDictionary,
    ) -> ProviderResult<FlightOffer> {
        let rub_total = chunk
            .price
            .ok_or_else(|| ProviderError::malformed_response("result missing price"))?;
        let converted = rub_total
            .checked_mul(self.config.rub_to_eur_rate)
            .ok_or_else(|| ProviderError::malformed_response("price conversion overflow"))?
            .round_dp(2);
        let price = Money::new(converted, currency.clone());

        let mut itineraries = Vec::with_capacity(chunk.proposals.len());
        for proposal in &chunk.proposals {
            for segment in &proposal.segment {
                carriers.insert(segment.flight.carrier.clone(), segment.flight.carrier_name.clone());
            }
            itineraries.push(map_proposal(proposal)?);
        }

        Ok(FlightOffer::new(
            OfferId::new(format!("travelpayouts-{uuid}-{index}")),
            price,
            itineraries,
        ))
    }
}

fn map_proposal(proposal: &RawProposal) -> ProviderResult<Itinerary> {
    let duration = FlightDuration::from_minutes(proposal.total_duration_minutes.unwrap_or(0));
    let mut segments = Vec::with_capacity(proposal.segment.len());
    for raw in &proposal.segment {
        segments.push(map_segment(raw)?);
    }
    Itinerary::new(duration, segments).map_err(|e| ProviderError::malformed_response(e.to_string()))
}

fn map_segment(raw: &RawSegment) -> ProviderResult<Segment> {
    let departure = FlightEndpoint::new(
        LocationCode::new(&raw.departure_code)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?,
        Timestamp::parse_flexible(&raw.departure_date)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?,
    );
    let arrival = FlightEndpoint::new(
        LocationCode::new(&raw.arrival_code)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?,
        Timestamp::parse_flexible(&raw.arrival_date)
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?,
    );
    Ok(Segment::new(
        departure,
        arrival,
        raw.flight.carrier.clone(),
        raw.flight.number.clone(),
        FlightDuration::from_minutes(raw.flight_duration_minutes.unwrap_or(0)),
    ))
}

#[async_trait]
impl ProviderAdapter for TravelpayoutsAdapter {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    async fn search(&self, request: &SearchRequest) -> ProviderResult<ProviderOffers> {
        let uuid = self.submit_job(request).await?;
        debug!(provider = %self.provider_id, %uuid, "job submitted");

        let chunks = self.poll_results(&uuid).await?;
        let offers = self.map_chunks(&uuid, chunks);
        debug!(provider = %self.provider_id, count = offers.offers.len(), "search complete");
        Ok(offers)
    }
}

// Wire shapes.

#[derive(Debug, Serialize)]
struct SubmitBody {
    host: String,
    marker: String,
    user_ip: String,
    signature: String,
    search_params: SubmitSearchParams,
}

#[derive(Debug, Serialize)]
struct SubmitSearchParams {
    trip_class: String,
    passengers: SubmitPassengers,
    directions: Vec<Direction>,
}

#[derive(Debug, Serialize)]
struct SubmitPassengers {
    adults: u32,
    children: u32,
    infants: u32,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChunk {
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    proposals: Vec<RawProposal>,
    #[serde(default)]
    search_completed: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawProposal {
    #[serde(default)]
    total_duration_minutes: Option<u32>,
    #[serde(default)]
    segment: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    departure_code: String,
    departure_date: String,
    arrival_code: String,
    arrival_date: String,
    flight: RawFlightInfo,
    #[serde(default)]
    flight_duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawFlightInfo {
    carrier: String,
    #[serde(default)]
    carrier_name: String,
    #[serde(default)]
    number: String,
}
