//! # Quote Use Case
//!
//! Turns a quote request into a searched, priced, notified and persisted
//! outcome.
//!
//! The flow mirrors the agency's quote funnel: run an aggregated search
//! for the route, take the cheapest offer, apply the platform discount,
//! message the requester and persist a booking record. Notification is
//! best-effort — a send failure is logged and reported in the outcome but
//! never fails the quote. Persistence failure does fail the quote.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::aggregation::OfferAggregator;
use crate::domain::entities::search_request::SearchRequest;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{LocationCode, Money, OfferId};
use crate::infrastructure::notification::NotificationSender;
use crate::infrastructure::persistence::{BookingRecord, QuoteRepository};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use tracing::{info, warn};

/// Currency recorded when no offer was found to price against.
const FALLBACK_CURRENCY: &str = "BRL";

/// Injectable pricing policy applied to quoted offers.
///
/// The discount percentage is business policy, not an engineering
/// contract; deployments tune it through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PricingPolicy {
    /// Platform discount in percent, applied to the cheapest offer.
    #[serde(default = "default_discount_percent")]
    pub discount_percent: Decimal,
}

fn default_discount_percent() -> Decimal {
    Decimal::new(12, 0)
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            discount_percent: default_discount_percent(),
        }
    }
}

impl PricingPolicy {
    /// Applies the discount to an amount, rounding to cents.
    ///
    /// # Errors
    ///
    /// Returns a domain error on arithmetic overflow.
    pub fn apply(&self, price: &Money) -> DomainResult<Money> {
        let hundred = Decimal::ONE_HUNDRED;
        let factor = hundred
            .checked_sub(self.discount_percent)
            .unwrap_or(Decimal::ZERO)
            .checked_div(hundred)
            .unwrap_or(Decimal::ZERO);
        let discounted = price.checked_mul(factor)?;
        Ok(Money::new(discounted.total().round_dp(2), discounted.currency().clone()))
    }
}

/// Incoming quote request from the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteRequest {
    /// Requester full name.
    pub full_name: String,
    /// Requester phone number.
    pub phone: String,
    /// Origin location code.
    pub origin: LocationCode,
    /// Destination location code.
    pub destination: LocationCode,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Return date; absent for one-way trips.
    pub return_date: Option<NaiveDate>,
    /// Number of travellers.
    pub passengers: u32,
}

impl QuoteRequest {
    /// Builds the canonical search request for this quote.
    ///
    /// # Errors
    ///
    /// Propagates the request builder's validation failures.
    pub fn to_search_request(&self) -> DomainResult<SearchRequest> {
        let mut builder = SearchRequest::builder(
            self.origin.clone(),
            self.destination.clone(),
            self.departure_date,
        )
        .adults(self.passengers);
        if let Some(return_date) = self.return_date {
            builder = builder.return_date(return_date);
        }
        builder.build()
    }
}

/// The offer a quote was priced against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedOffer {
    /// The underlying offer id.
    pub offer_id: OfferId,
    /// Provider price before the platform discount.
    pub list_price: Money,
    /// Price after the platform discount.
    pub quoted_price: Money,
}

/// Outcome of a processed quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOutcome {
    /// Identifier of the persisted booking record.
    pub booking_id: Uuid,
    /// The priced offer; `None` when no provider had availability.
    pub offer: Option<QuotedOffer>,
    /// Whether the notification was delivered.
    pub notification_sent: bool,
}

/// Service orchestrating the quote funnel.
#[derive(Debug, Clone)]
pub struct QuoteService {
    aggregator: OfferAggregator,
    notifier: Arc<dyn NotificationSender>,
    repository: Arc<dyn QuoteRepository>,
    pricing: PricingPolicy,
}

impl QuoteService {
    /// Creates a new quote service.
    #[must_use]
    pub fn new(
        aggregator: OfferAggregator,
        notifier: Arc<dyn NotificationSender>,
        repository: Arc<dyn QuoteRepository>,
        pricing: PricingPolicy,
    ) -> Self {
        Self {
            aggregator,
            notifier,
            repository,
            pricing,
        }
    }

    /// Processes a quote request end to end.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Domain`] for invalid request data and
    /// [`ApplicationError::Repository`] when the booking cannot be saved.
    /// Provider and notification failures do not fail the quote.
    pub async fn request_quote(&self, request: QuoteRequest) -> ApplicationResult<QuoteOutcome> {
        let search_request = request.to_search_request()?;
        let result = self.aggregator.aggregate(&search_request).await;

        // Aggregation output is price-sorted, so the head is the cheapest.
        let quoted = match result.offers().first() {
            Some(cheapest) => Some(QuotedOffer {
                offer_id: cheapest.id().clone(),
                list_price: cheapest.price().clone(),
                quoted_price: self.pricing.apply(cheapest.price())?,
            }),
            None => None,
        };

        let message = self.compose_message(&request, quoted.as_ref());
        let notification_sent = match self.notifier.send_text(&request.phone, &message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "notification failed, continuing with quote");
                false
            }
        };

        let record = Self::booking_record(&request, quoted.as_ref());
        self.repository
            .insert_booking(&record)
            .await
            .map_err(ApplicationError::Repository)?;

        info!(
            booking_id = %record.id,
            priced = quoted.is_some(),
            notification_sent,
            "quote processed"
        );

        Ok(QuoteOutcome {
            booking_id: record.id,
            offer: quoted,
            notification_sent,
        })
    }

    /// Composes the requester-facing message.
    fn compose_message(&self, request: &QuoteRequest, quoted: Option<&QuotedOffer>) -> String {
        match quoted {
            Some(offer) => format!(
                "Hello, {}! We found a flight from {} to {} for {}. Reply here and we will help you book it.",
                request.full_name, request.origin, request.destination, offer.quoted_price
            ),
            None => format!(
                "Hello, {}! We could not find online options from {} to {} for those dates. We will check with our partners and get back to you shortly.",
                request.full_name, request.origin, request.destination
            ),
        }
    }

    /// Builds the record persisted for this quote.
    fn booking_record(request: &QuoteRequest, quoted: Option<&QuotedOffer>) -> BookingRecord {
        let (total_price, currency) = match quoted {
            Some(offer) => (
                offer.quoted_price.total(),
                offer.quoted_price.currency().to_string(),
            ),
            None => (Decimal::ZERO, FALLBACK_CURRENCY.to_string()),
        };

        BookingRecord {
            id: Uuid::new_v4(),
            route_id: BookingRecord::route_id_for(
                request.origin.as_str(),
                request.destination.as_str(),
            ),
            route_label: format!("Quote: {} to {}", request.origin, request.destination),
            full_name: request.full_name.clone(),
            phone: request.phone.clone(),
            adults: request.passengers,
            children: 0,
            departure_date: request.departure_date,
            return_date: request.return_date,
            total_price,
            currency,
            created_at: Utc::now(),
        }
    }
}
