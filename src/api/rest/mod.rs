//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! - `POST /api/v1/flights/search` - aggregated flight search
//! - `POST /api/v1/flights/return-options` - two-phase return fetch
//! - `POST /api/v1/quotes` - quote funnel
//! - `GET /api/v1/health` - liveness probe
//!
//! # Usage
//!
//! ```ignore
//! use fareflow::api::rest::{create_router, AppState};
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, DictionariesBody, ErrorResponse, HealthResponse, QuotePayload,
    SearchPayload, SearchResponseBody,
};
pub use routes::create_router;
