//! # fareflow server
//!
//! Wires configuration, provider adapters, persistence and the
//! notification sender into the REST API.

use anyhow::Context;
use fareflow::api::rest::{create_router, AppState};
use fareflow::application::services::aggregation::OfferAggregator;
use fareflow::application::services::quote::QuoteService;
use fareflow::config::AppConfig;
use fareflow::infrastructure::notification::{DisabledSender, NotificationSender, WhatsAppSender};
use fareflow::infrastructure::persistence::{
    InMemoryQuoteRepository, PostgresQuoteRepository, QuoteRepository,
};
use fareflow::infrastructure::providers::amadeus::AmadeusAdapter;
use fareflow::infrastructure::providers::serpapi::SerpApiAdapter;
use fareflow::infrastructure::providers::traits::{ProviderAdapter, TwoPhaseProviderAdapter};
use fareflow::infrastructure::providers::travelpayouts::TravelpayoutsAdapter;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
    let mut two_phase: Option<Arc<dyn TwoPhaseProviderAdapter>> = None;

    if let Some(amadeus) = config.providers.amadeus.clone() {
        adapters.push(Arc::new(
            AmadeusAdapter::new(amadeus).context("failed to build amadeus adapter")?,
        ));
    }
    if let Some(serpapi) = config.providers.serpapi.clone() {
        let adapter =
            Arc::new(SerpApiAdapter::new(serpapi).context("failed to build serpapi adapter")?);
        adapters.push(Arc::clone(&adapter) as Arc<dyn ProviderAdapter>);
        two_phase = Some(adapter);
    }
    if let Some(travelpayouts) = config.providers.travelpayouts.clone() {
        adapters.push(Arc::new(
            TravelpayoutsAdapter::new(travelpayouts)
                .context("failed to build travelpayouts adapter")?,
        ));
    }
    if adapters.is_empty() {
        warn!("no providers configured, every search will come back empty");
    }

    let repository: Arc<dyn QuoteRepository> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.url)
                .await
                .context("failed to connect to database")?;
            Arc::new(PostgresQuoteRepository::new(pool))
        }
        None => {
            warn!("no database configured, using in-memory persistence");
            Arc::new(InMemoryQuoteRepository::new())
        }
    };

    let notifier: Arc<dyn NotificationSender> = match config.notification.clone() {
        Some(notification) => Arc::new(
            WhatsAppSender::new(notification).context("failed to build notification sender")?,
        ),
        None => {
            warn!("no notification service configured");
            Arc::new(DisabledSender)
        }
    };

    let aggregator = OfferAggregator::new(adapters);
    let quote_service = QuoteService::new(
        aggregator.clone(),
        notifier,
        repository,
        config.pricing,
    );

    let state = AppState {
        aggregator,
        quote_service,
        two_phase,
    };

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "fareflow listening");

    axum::serve(listener, create_router(state))
        .await
        .context("server error")?;

    Ok(())
}
