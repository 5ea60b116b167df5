//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`], [`OfferId`]: string-backed identifiers
//!
//! ## Validated Types
//!
//! - [`LocationCode`]: IATA-like location code
//! - [`CurrencyCode`], [`Money`]: ISO 4217 currency and decimal amounts
//! - [`FlightDuration`]: `PT#H#M` durations with raw-minute conversion
//! - [`Timestamp`]: UTC departure/arrival times
//!
//! ## Domain Enums
//!
//! - [`TravelClass`]: cabin class with provider code mappings
//! - [`TimeOfDay`]: departure-time filter buckets

pub mod duration;
pub mod enums;
pub mod ids;
pub mod location;
pub mod money;
pub mod timestamp;

pub use duration::FlightDuration;
pub use enums::{ParseEnumError, TimeOfDay, TravelClass};
pub use ids::{OfferId, ProviderId};
pub use location::LocationCode;
pub use money::{CurrencyCode, Money};
pub use timestamp::Timestamp;
