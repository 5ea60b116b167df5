//! # In-Memory Repository
//!
//! Vec-backed [`QuoteRepository`] for tests and local development.

use crate::infrastructure::persistence::traits::{
    BookingRecord, QuoteRepository, RepositoryResult,
};
use async_trait::async_trait;
use parking_lot::RwLock;

/// In-memory quote repository.
#[derive(Debug, Default)]
pub struct InMemoryQuoteRepository {
    bookings: RwLock<Vec<BookingRecord>>,
}

impl InMemoryQuoteRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored bookings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.read().len()
    }

    /// Returns true if no bookings are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.read().is_empty()
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn insert_booking(&self, record: &BookingRecord) -> RepositoryResult<()> {
        self.bookings.write().push(record.clone());
        Ok(())
    }

    async fn find_booking(&self, id: uuid::Uuid) -> RepositoryResult<Option<BookingRecord>> {
        Ok(self
            .bookings
            .read()
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }
}
