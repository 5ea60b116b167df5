//! # Configuration
//!
//! Typed application configuration.
//!
//! Settings load in layers: `config/default.toml`, then an optional
//! environment-specific file selected by `RUN_MODE`, then
//! `FAREFLOW__`-prefixed environment variables (`__` separates nesting,
//! e.g. `FAREFLOW__SERVER__PORT=8080`). Provider sections are optional;
//! only configured providers are wired into the aggregator.

use crate::application::services::quote::PricingPolicy;
use crate::infrastructure::notification::WhatsAppConfig;
use crate::infrastructure::providers::amadeus::AmadeusConfig;
use crate::infrastructure::providers::serpapi::SerpApiConfig;
use crate::infrastructure::providers::travelpayouts::TravelpayoutsConfig;
use serde::Deserialize;
use std::env;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,
}

/// Upstream provider settings; unset providers are not queried.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    /// Token-authenticated provider (profile A).
    #[serde(default)]
    pub amadeus: Option<AmadeusConfig>,
    /// Key-authenticated two-phase provider (profile B).
    #[serde(default)]
    pub serpapi: Option<SerpApiConfig>,
    /// Signed job/poll provider (profile C).
    #[serde(default)]
    pub travelpayouts: Option<TravelpayoutsConfig>,
}

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings; absent means in-memory persistence.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Provider adapter settings.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Notification sender settings; absent disables notifications.
    #[serde(default)]
    pub notification: Option<WhatsAppConfig>,
    /// Quote pricing policy.
    #[serde(default)]
    pub pricing: PricingPolicy,
}

impl AppConfig {
    /// Loads configuration from files and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `config::ConfigError` when a source fails to load or a
    /// value fails to deserialize.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FAREFLOW")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_deserializes_with_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.database.is_none());
        assert!(config.providers.amadeus.is_none());
        assert!(config.notification.is_none());
    }

    #[test]
    fn provider_sections_deserialize() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "providers": {
                    "serpapi": { "base_url": "https://serpapi.com", "api_key": "k" },
                    "travelpayouts": {
                        "base_url": "https://api.travelpayouts.com",
                        "api_token": "t",
                        "marker": "m",
                        "host": "example.com"
                    }
                }
            }"#,
        )
        .unwrap();

        let serpapi = config.providers.serpapi.unwrap();
        assert_eq!(serpapi.currency, "BRL");

        let travelpayouts = config.providers.travelpayouts.unwrap();
        assert_eq!(travelpayouts.max_poll_attempts, 30);
        assert_eq!(travelpayouts.poll_interval_ms, 3000);
    }
}
