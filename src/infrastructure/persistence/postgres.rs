//! # Postgres Repository
//!
//! `sqlx`-backed [`QuoteRepository`] writing to the `bookings` table.
//!
//! Schema ownership (migrations, indexing) lives with the surrounding
//! application; this module only performs the fixed-shape insert and the
//! id lookup the core needs.

use crate::infrastructure::persistence::traits::{
    BookingRecord, QuoteRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::Row;
use uuid::Uuid;

/// Postgres quote repository.
#[derive(Debug, Clone)]
pub struct PostgresQuoteRepository {
    pool: PgPool,
}

impl PostgresQuoteRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for PostgresQuoteRepository {
    async fn insert_booking(&self, record: &BookingRecord) -> RepositoryResult<()> {
        sqlx::query(
            r"
            INSERT INTO bookings (
                id, route_id, route_label, full_name, phone,
                adults, children, departure_date, return_date,
                total_price, currency, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(record.id)
        .bind(&record.route_id)
        .bind(&record.route_label)
        .bind(&record.full_name)
        .bind(&record.phone)
        .bind(i64::from(record.adults))
        .bind(i64::from(record.children))
        .bind(record.departure_date)
        .bind(record.return_date)
        .bind(record.total_price)
        .bind(&record.currency)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(())
    }

    async fn find_booking(&self, id: Uuid) -> RepositoryResult<Option<BookingRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, route_id, route_label, full_name, phone,
                   adults, children, departure_date, return_date,
                   total_price, currency, created_at
            FROM bookings
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|row| {
            let adults: i64 = row
                .try_get("adults")
                .map_err(|e| RepositoryError::serialization(e.to_string()))?;
            let children: i64 = row
                .try_get("children")
                .map_err(|e| RepositoryError::serialization(e.to_string()))?;

            Ok(BookingRecord {
                id: row
                    .try_get::<Uuid, _>("id")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                route_id: row
                    .try_get::<String, _>("route_id")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                route_label: row
                    .try_get::<String, _>("route_label")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                full_name: row
                    .try_get::<String, _>("full_name")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                phone: row
                    .try_get::<String, _>("phone")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                adults: u32::try_from(adults)
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                children: u32::try_from(children)
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                departure_date: row
                    .try_get::<NaiveDate, _>("departure_date")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                return_date: row
                    .try_get::<Option<NaiveDate>, _>("return_date")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                total_price: row
                    .try_get::<Decimal, _>("total_price")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                currency: row
                    .try_get::<String, _>("currency")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
                created_at: row
                    .try_get::<DateTime<Utc>, _>("created_at")
                    .map_err(|e| RepositoryError::serialization(e.to_string()))?,
            })
        })
        .transpose()
    }
}
