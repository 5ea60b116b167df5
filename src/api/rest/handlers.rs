//! # REST Handlers
//!
//! Request/response DTOs and handler functions.
//!
//! The three user-visible outcomes stay distinguishable at this boundary:
//! a hard validation failure is `400` with field details, "no flights
//! found" is `200` with an empty offer list and no warnings, and partial
//! provider failure is `200` with a `warnings` list naming the providers
//! that did not respond.

use crate::application::error::ApplicationError;
use crate::application::services::aggregation::{AggregateResult, OfferAggregator};
use crate::application::services::filtering::FilterFacets;
use crate::application::services::quote::{QuoteOutcome, QuoteRequest, QuoteService};
use crate::domain::entities::offer::{CarrierDictionary, FlightOffer};
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::value_objects::{LocationCode, TravelClass};
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::TwoPhaseProviderAdapter;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Aggregation engine over the configured providers.
    pub aggregator: OfferAggregator,
    /// Quote funnel service.
    pub quote_service: QuoteService,
    /// Two-phase provider used for return-option fetches, when configured.
    pub two_phase: Option<Arc<dyn TwoPhaseProviderAdapter>>,
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error summary.
    pub error: String,
    /// Per-field details for validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Handler-level error mapped onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request payload; `400`.
    Validation(Vec<String>),
    /// A directly-called provider failed; `502`/`504`.
    Provider(ProviderError),
    /// Return-options requested but no two-phase provider is configured;
    /// `501`.
    TwoPhaseUnavailable,
    /// Anything else; `500`.
    Internal(String),
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(message) => Self::Validation(vec![message]),
            ApplicationError::Domain(e) => Self::Validation(vec![e.to_string()]),
            ApplicationError::Provider(e) => Self::Provider(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "invalid request".to_string(),
                    details,
                },
            ),
            Self::Provider(e) => {
                let status = match &e {
                    ProviderError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status,
                    ErrorResponse {
                        error: e.to_string(),
                        details: vec![],
                    },
                )
            }
            Self::TwoPhaseUnavailable => (
                StatusCode::NOT_IMPLEMENTED,
                ErrorResponse {
                    error: "no two-phase provider configured".to_string(),
                    details: vec![],
                },
            ),
            Self::Internal(message) => {
                error!(%message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "internal error".to_string(),
                        details: vec![],
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Incoming search payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    /// Origin location code.
    #[serde(default)]
    pub origin: String,
    /// Destination location code.
    #[serde(default)]
    pub destination: String,
    /// Departure date, `YYYY-MM-DD`.
    #[serde(default)]
    pub departure_date: String,
    /// Return date, `YYYY-MM-DD`; presence makes the search round-trip.
    #[serde(default)]
    pub return_date: Option<String>,
    /// Adult count; defaults to 1.
    #[serde(default)]
    pub adults: Option<u32>,
    /// Child count; defaults to 0.
    #[serde(default)]
    pub children: Option<u32>,
    /// Infant count; defaults to 0.
    #[serde(default)]
    pub infants: Option<u32>,
    /// Cabin class name; defaults to economy.
    #[serde(default)]
    pub travel_class: Option<String>,
    /// Provider-side result cap hint.
    #[serde(default)]
    pub max: Option<u32>,
    /// Continuation token for return-option fetches.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

impl SearchPayload {
    /// Validates the payload into a canonical request, collecting every
    /// field problem instead of stopping at the first.
    fn to_search_request(&self) -> Result<SearchRequest, Vec<String>> {
        let mut details = Vec::new();

        let origin = LocationCode::new(&self.origin)
            .map_err(|e| details.push(format!("origin: {e}")))
            .ok();
        let destination = LocationCode::new(&self.destination)
            .map_err(|e| details.push(format!("destination: {e}")))
            .ok();
        let departure_date = self
            .departure_date
            .parse::<NaiveDate>()
            .map_err(|_| details.push(format!("departureDate: not a date: {:?}", self.departure_date)))
            .ok();

        let return_date = match &self.return_date {
            None => None,
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => Some(date),
                Err(_) => {
                    details.push(format!("returnDate: not a date: {raw:?}"));
                    None
                }
            },
        };

        let travel_class = match &self.travel_class {
            None => TravelClass::default(),
            Some(raw) => raw.parse::<TravelClass>().unwrap_or_else(|e| {
                details.push(e.to_string());
                TravelClass::default()
            }),
        };

        let (Some(origin), Some(destination), Some(departure_date)) =
            (origin, destination, departure_date)
        else {
            return Err(details);
        };
        if !details.is_empty() {
            return Err(details);
        }

        let mut builder = SearchRequest::builder(origin, destination, departure_date)
            .adults(self.adults.unwrap_or(1))
            .children(self.children.unwrap_or(0))
            .infants(self.infants.unwrap_or(0))
            .travel_class(travel_class);
        if let Some(return_date) = return_date {
            builder = builder.return_date(return_date);
        }
        if let Some(max) = self.max {
            builder = builder.max_results(max);
        }

        builder.build().map_err(|e| vec![e.to_string()])
    }
}

/// Search response body in the canonical wire shape.
#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    /// Price-sorted offers.
    pub data: Vec<FlightOffer>,
    /// Carrier dictionary for the offer set.
    pub dictionaries: DictionariesBody,
    /// Filter facet values derived from the offer set.
    pub facets: FilterFacets,
    /// Soft warnings; one entry per unresponsive provider.
    pub warnings: Vec<String>,
}

/// Carrier dictionary wrapper.
#[derive(Debug, Serialize)]
pub struct DictionariesBody {
    /// Code to display-name mapping.
    pub carriers: CarrierDictionary,
}

impl SearchResponseBody {
    fn from_result(result: AggregateResult) -> Self {
        let (offers, carriers, failed) = result.into_parts();
        let facets = FilterFacets::from_offers(&offers);
        let warnings = failed
            .iter()
            .map(|failure| format!("provider {} did not respond: {}", failure.provider, failure.error))
            .collect();
        Self {
            data: offers,
            dictionaries: DictionariesBody { carriers },
            facets,
            warnings,
        }
    }
}

/// `POST /api/v1/flights/search` — aggregated search across all
/// configured providers.
pub async fn search_flights(
    State(state): State<AppState>,
    Json(payload): Json<SearchPayload>,
) -> Result<Json<SearchResponseBody>, ApiError> {
    let request = payload.to_search_request().map_err(ApiError::Validation)?;
    let result = state.aggregator.aggregate(&request).await;
    Ok(Json(SearchResponseBody::from_result(result)))
}

/// `POST /api/v1/flights/return-options` — second phase of the two-phase
/// flow: fetch return options for a previously selected outbound offer.
pub async fn return_options(
    State(state): State<AppState>,
    Json(payload): Json<SearchPayload>,
) -> Result<Json<SearchResponseBody>, ApiError> {
    let token = payload
        .continuation_token
        .clone()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Validation(vec!["continuationToken is required".to_string()]))?;
    let request = payload.to_search_request().map_err(ApiError::Validation)?;

    let adapter = state.two_phase.as_ref().ok_or(ApiError::TwoPhaseUnavailable)?;
    let offers = adapter
        .search_return(&request, &token)
        .await
        .map_err(ApiError::Provider)?;

    let facets = FilterFacets::from_offers(&offers.offers);
    Ok(Json(SearchResponseBody {
        data: offers.offers,
        dictionaries: DictionariesBody {
            carriers: offers.carriers,
        },
        facets,
        warnings: vec![],
    }))
}

/// Incoming quote payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    /// Requester full name.
    #[serde(default)]
    pub full_name: String,
    /// Requester phone number.
    #[serde(default)]
    pub phone: String,
    /// Origin location code.
    #[serde(default)]
    pub origin: String,
    /// Destination location code.
    #[serde(default)]
    pub destination: String,
    /// Departure date, `YYYY-MM-DD`.
    #[serde(default)]
    pub departure_date: String,
    /// Return date, `YYYY-MM-DD`.
    #[serde(default)]
    pub return_date: Option<String>,
    /// Number of travellers; defaults to 1.
    #[serde(default)]
    pub passengers: Option<u32>,
}

impl QuotePayload {
    fn to_quote_request(&self) -> Result<QuoteRequest, Vec<String>> {
        let mut details = Vec::new();

        if self.full_name.trim().is_empty() {
            details.push("fullName is required".to_string());
        }
        if self.phone.trim().is_empty() {
            details.push("phone is required".to_string());
        }

        let origin = LocationCode::new(&self.origin)
            .map_err(|e| details.push(format!("origin: {e}")))
            .ok();
        let destination = LocationCode::new(&self.destination)
            .map_err(|e| details.push(format!("destination: {e}")))
            .ok();
        let departure_date = self
            .departure_date
            .parse::<NaiveDate>()
            .map_err(|_| details.push(format!("departureDate: not a date: {:?}", self.departure_date)))
            .ok();
        let return_date = match &self.return_date {
            None => None,
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => Some(date),
                Err(_) => {
                    details.push(format!("returnDate: not a date: {raw:?}"));
                    None
                }
            },
        };

        let (Some(origin), Some(destination), Some(departure_date)) =
            (origin, destination, departure_date)
        else {
            return Err(details);
        };
        if !details.is_empty() {
            return Err(details);
        }

        Ok(QuoteRequest {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            origin,
            destination,
            departure_date,
            return_date,
            passengers: self.passengers.unwrap_or(1),
        })
    }
}

/// `POST /api/v1/quotes` — run the quote funnel for a booking-form
/// submission.
pub async fn request_quote(
    State(state): State<AppState>,
    Json(payload): Json<QuotePayload>,
) -> Result<Json<QuoteOutcome>, ApiError> {
    let request = payload.to_quote_request().map_err(ApiError::Validation)?;
    let outcome = state.quote_service.request_quote(request).await?;
    Ok(Json(outcome))
}

/// Health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    pub status: &'static str,
    /// Number of configured providers.
    pub providers: usize,
}

/// `GET /api/v1/health` — liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: state.aggregator.provider_count(),
    })
}
