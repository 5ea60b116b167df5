//! # Repository Traits
//!
//! Port definitions for quote persistence.
//!
//! The aggregation core hands its output (a chosen or combined offer plus
//! requester contact details) to an insert operation with a fixed record
//! shape. The core owns neither schema migrations nor querying; this port
//! is the whole surface it touches.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persisted outcome of a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Route identifier, `ORIGIN-DESTINATION`.
    pub route_id: String,
    /// Human-readable route label.
    pub route_label: String,
    /// Requester full name.
    pub full_name: String,
    /// Requester phone number as given.
    pub phone: String,
    /// Number of adult travellers.
    pub adults: u32,
    /// Number of child travellers.
    pub children: u32,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Return date for round trips.
    pub return_date: Option<NaiveDate>,
    /// Quoted total price; zero when no offer was found.
    pub total_price: Decimal,
    /// Currency of the quoted total.
    pub currency: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Builds the route identifier for an origin/destination pair.
    #[must_use]
    pub fn route_id_for(origin: &str, destination: &str) -> String {
        format!("{origin}-{destination}")
    }
}

/// Port for persisting and retrieving quote bookings.
#[async_trait]
pub trait QuoteRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a booking record.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] when the insert fails.
    async fn insert_booking(&self, record: &BookingRecord) -> RepositoryResult<()>;

    /// Fetches a booking record by id.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] when the lookup fails; an unknown id
    /// yields `Ok(None)`.
    async fn find_booking(&self, id: Uuid) -> RepositoryResult<Option<BookingRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_id_format() {
        assert_eq!(BookingRecord::route_id_for("GRU", "LIS"), "GRU-LIS");
    }

    #[test]
    fn error_display() {
        let error = RepositoryError::not_found("booking", "abc");
        assert!(error.to_string().contains("booking"));
        assert!(error.to_string().contains("abc"));
    }
}
