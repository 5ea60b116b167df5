//! # Application Services
//!
//! Orchestration around the canonical model: aggregation, filtering,
//! round-trip selection and the quote funnel.

pub mod aggregation;
pub mod filtering;
pub mod quote;
pub mod selection;

pub use aggregation::{AggregateResult, OfferAggregator, ProviderFailure};
pub use filtering::{apply_filters, FilterFacets, FilterState, PriceRange};
pub use quote::{PricingPolicy, QuoteOutcome, QuoteRequest, QuoteService, QuotedOffer};
pub use selection::{OutboundSelection, ReturnSearch, SelectionError};
