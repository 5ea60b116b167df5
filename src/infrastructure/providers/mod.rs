//! # Provider Adapters
//!
//! Upstream flight-search integrations behind one uniform port.
//!
//! Three adapter behavior profiles are implemented:
//!
//! - [`amadeus`]: bearer-token auth, one synchronous GET
//! - [`serpapi`]: static key auth, two-phase outbound/return search
//! - [`travelpayouts`]: signed job submission with polling
//!
//! All of them translate their provider's shape into the canonical
//! [`FlightOffer`](crate::domain::entities::offer::FlightOffer) model and
//! classify every failure into a typed
//! [`ProviderError`](error::ProviderError).

pub mod amadeus;
pub mod error;
pub mod http_client;
pub mod serpapi;
pub mod traits;
pub mod travelpayouts;

pub use amadeus::{AmadeusAdapter, AmadeusConfig};
pub use error::{ProviderError, ProviderResult};
pub use http_client::HttpClient;
pub use serpapi::{SerpApiAdapter, SerpApiConfig};
pub use traits::{ProviderAdapter, ProviderOffers, TwoPhaseProviderAdapter};
pub use travelpayouts::{TravelpayoutsAdapter, TravelpayoutsConfig};
