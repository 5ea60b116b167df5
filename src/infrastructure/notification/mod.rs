//! # Notification
//!
//! Send-message-by-phone-number port and its HTTP implementation.
//!
//! The quote use case notifies the requester over a WhatsApp-style
//! send-text service. Notification is strictly best-effort: the caller
//! logs failures and carries on, so the sender never aborts a quote.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Error type for notification operations.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// Transport-level failure.
    #[error("notification network error: {0}")]
    Network(String),

    /// Service answered with a non-2xx status.
    #[error("notification http error ({status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message or body excerpt.
        message: String,
    },

    /// Service accepted the request but reported a delivery failure.
    #[error("notification rejected: {0}")]
    Rejected(String),
}

impl NotificationError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an HTTP error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Port for sending a freeform text message to a phone number.
#[async_trait]
pub trait NotificationSender: Send + Sync + fmt::Debug {
    /// Sends a text message to the given phone number.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`] describing the failure; callers
    /// treat delivery as best-effort.
    async fn send_text(&self, phone: &str, message: &str) -> Result<(), NotificationError>;
}

/// Configuration for the WhatsApp send-text client.
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Base URL of the send-text service.
    pub base_url: String,
    /// API token.
    pub token: String,
    /// Service instance id.
    pub instance_id: String,
    /// Country calling code prefixed to bare national numbers.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_country_code() -> String {
    "55".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// HTTP client for a WhatsApp-style send-text service.
#[derive(Debug, Clone)]
pub struct WhatsAppSender {
    client: Client,
    config: WhatsAppConfig,
}

impl WhatsAppSender {
    /// Creates a new sender from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::Network` if the HTTP client cannot be
    /// constructed.
    pub fn new(config: WhatsAppConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NotificationError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Builds the messaging JID for a phone number: digits only, country
    /// code prefixed unless already present.
    #[must_use]
    pub fn jid_for(&self, phone: &str) -> String {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        let full = if digits.starts_with(&self.config.country_code) {
            digits
        } else {
            format!("{}{}", self.config.country_code, digits)
        };
        format!("{full}@s.whatsapp.net")
    }
}

#[async_trait]
impl NotificationSender for WhatsAppSender {
    async fn send_text(&self, phone: &str, message: &str) -> Result<(), NotificationError> {
        let url = format!("{}/api/v1/send-text", self.config.base_url);
        let jid = self.jid_for(phone);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("token", self.config.token.as_str()),
                ("instance_id", self.config.instance_id.as_str()),
                ("jid", jid.as_str()),
                ("msg", message),
            ])
            .send()
            .await
            .map_err(|e| NotificationError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::http(
                status.as_u16(),
                body.chars().take(200).collect::<String>(),
            ));
        }

        let outcome: SendOutcome = response
            .json()
            .await
            .map_err(|e| NotificationError::rejected(format!("unparseable response: {e}")))?;
        if !outcome.success {
            return Err(NotificationError::rejected(
                outcome.message.unwrap_or_else(|| "delivery failed".to_string()),
            ));
        }

        debug!(%jid, "notification sent");
        Ok(())
    }
}

/// Sender used when no notification service is configured: logs the
/// message and reports it as not delivered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSender;

#[async_trait]
impl NotificationSender for DisabledSender {
    async fn send_text(&self, phone: &str, _message: &str) -> Result<(), NotificationError> {
        Err(NotificationError::rejected(format!(
            "notification disabled, not messaging {phone}"
        )))
    }
}

#[derive(Debug, Deserialize)]
struct SendOutcome {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sender() -> WhatsAppSender {
        WhatsAppSender::new(WhatsAppConfig {
            base_url: "http://localhost".to_string(),
            token: "t".to_string(),
            instance_id: "i".to_string(),
            country_code: default_country_code(),
            timeout_ms: 1000,
        })
        .unwrap()
    }

    #[test]
    fn jid_strips_formatting_and_prefixes_country() {
        assert_eq!(sender().jid_for("(11) 98765-4321"), "5511987654321@s.whatsapp.net");
    }

    #[test]
    fn jid_keeps_existing_country_code() {
        assert_eq!(sender().jid_for("5511987654321"), "5511987654321@s.whatsapp.net");
    }
}
