//! # Persistence
//!
//! Quote repository port and its backends.

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use in_memory::InMemoryQuoteRepository;
pub use postgres::PostgresQuoteRepository;
pub use traits::{BookingRecord, QuoteRepository, RepositoryError, RepositoryResult};
