//! # Routes
//!
//! Router assembly for the REST API.

use crate::api::rest::handlers::{
    health, request_quote, return_options, search_flights, AppState,
};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/flights/search", post(search_flights))
        .route("/api/v1/flights/return-options", post(return_options))
        .route("/api/v1/quotes", post(request_quote))
        .route("/api/v1/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
