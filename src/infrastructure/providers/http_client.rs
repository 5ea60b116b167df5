//! # HTTP Client Utilities
//!
//! Shared HTTP plumbing for provider adapters.
//!
//! Wraps `reqwest` with a per-client timeout, typed JSON helpers and a
//! single place where transport failures and non-2xx statuses map into
//! [`ProviderError`] variants, so the three adapters classify failures
//! identically.

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Maximum number of body characters carried into an error message.
const ERROR_BODY_EXCERPT: usize = 200;

/// HTTP client wrapper for provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` if the underlying client cannot be
    /// constructed.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ProviderError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request with query parameters and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` on transport failure,
    /// `ProviderError::UpstreamHttp`/`AuthFailure` on non-2xx status and
    /// `ProviderError::MalformedResponse` when the body is not valid JSON
    /// for `T`.
    pub async fn get_json<T, P>(&self, url: &str, params: &P) -> ProviderResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::handle_response(response).await
    }

    /// Makes a GET request with query parameters and an extra header.
    ///
    /// # Errors
    ///
    /// Same classification as [`HttpClient::get_json`].
    pub async fn get_json_with_header<T, P>(
        &self,
        url: &str,
        params: &P,
        header: (&str, &str),
    ) -> ProviderResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(header.0, header.1)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::handle_response(response).await
    }

    /// Makes a GET request with a bearer token and query parameters.
    ///
    /// # Errors
    ///
    /// Same classification as [`HttpClient::get_json`].
    pub async fn get_json_bearer<T, P>(
        &self,
        url: &str,
        params: &P,
        token: &str,
    ) -> ProviderResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::handle_response(response).await
    }

    /// Makes a POST request with a form-encoded body (client-credentials
    /// token exchanges).
    ///
    /// # Errors
    ///
    /// Same classification as [`HttpClient::get_json`].
    pub async fn post_form<T, F>(&self, url: &str, form: &F) -> ProviderResult<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::handle_response(response).await
    }

    /// Makes a POST request with a JSON body and an extra header.
    ///
    /// # Errors
    ///
    /// Same classification as [`HttpClient::get_json`].
    pub async fn post_json<T, B>(
        &self,
        url: &str,
        body: &B,
        header: (&str, &str),
    ) -> ProviderResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .header(header.0, header.1)
            .send()
            .await
            .map_err(map_transport_error)?;
        Self::handle_response(response).await
    }

    /// Checks status and deserializes the JSON body.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                ProviderError::malformed_response(format!("failed to parse response: {e}"))
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, &body))
        }
    }
}

/// Maps a reqwest error to a provider error.
fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::network(format!("request timed out: {error}"))
    } else if error.is_connect() {
        ProviderError::network(format!("connection failed: {error}"))
    } else {
        ProviderError::network(format!("http request failed: {error}"))
    }
}

/// Maps a non-2xx status to a provider error.
fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
    let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::auth_failure(format!("upstream rejected credentials: {excerpt}"))
        }
        _ => ProviderError::upstream_http(status.as_u16(), excerpt),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000).unwrap();
        assert_eq!(client.timeout_ms(), 5000);
    }

    #[test]
    fn status_mapping_auth() {
        let error = map_status_error(StatusCode::UNAUTHORIZED, "no");
        assert!(error.is_auth_failure());
        let error = map_status_error(StatusCode::FORBIDDEN, "no");
        assert!(error.is_auth_failure());
    }

    #[test]
    fn status_mapping_other() {
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn error_body_is_truncated() {
        let long_body = "x".repeat(1000);
        let error = map_status_error(StatusCode::BAD_GATEWAY, &long_body);
        assert!(error.to_string().len() < 400);
    }
}
