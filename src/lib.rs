//! # fareflow
//!
//! Multi-provider flight-offer search and aggregation engine.
//!
//! fareflow queries several independently-shaped upstream flight-search
//! services concurrently, normalizes their responses into one canonical
//! offer shape, merges and price-sorts the results, and exposes the unified
//! list together with per-provider failure information. Around the core it
//! carries a quote-request use case (cheapest offer, notification,
//! persisted booking record) and a thin REST surface.
//!
//! # Architecture
//!
//! The crate follows a layered architecture:
//!
//! - [`domain`]: canonical value objects and entities ([`domain::entities::offer::FlightOffer`],
//!   [`domain::entities::search_request::SearchRequest`])
//! - [`application`]: aggregation, filtering, round-trip selection and the
//!   quote use case
//! - [`infrastructure`]: provider adapters, notification sender and
//!   persistence backends
//! - [`api`]: REST endpoints
//!
//! # Example
//!
//! ```ignore
//! use fareflow::application::services::aggregation::OfferAggregator;
//! use fareflow::domain::entities::search_request::SearchRequest;
//!
//! let request = SearchRequest::builder("GRU", "LIS", departure)
//!     .adults(2)
//!     .build()?;
//!
//! let result = aggregator.aggregate(&request).await;
//! for offer in result.offers() {
//!     println!("{}", offer);
//! }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
