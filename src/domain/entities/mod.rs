//! # Domain Entities
//!
//! The canonical search request and offer model.

pub mod offer;
pub mod search_request;

pub use offer::{CarrierDictionary, FlightEndpoint, FlightOffer, Itinerary, Segment};
pub use search_request::{SearchRequest, SearchRequestBuilder};
