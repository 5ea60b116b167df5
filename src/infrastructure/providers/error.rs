//! # Provider Errors
//!
//! Typed failure classification for provider adapter operations.
//!
//! Adapters never let a provider-specific failure escape untyped: every
//! failure path maps into a [`ProviderError`] variant. Note that zero
//! offers is not a failure — adapters return `Ok` with an empty offer
//! list, and [`ProviderError::EmptyResult`] exists only as a
//! classification value at the reporting boundary.
//!
//! # Examples
//!
//! ```
//! use fareflow::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::upstream_http(503, "service unavailable");
//! assert!(error.is_transient());
//!
//! let error = ProviderError::auth_failure("token exchange rejected");
//! assert!(!error.is_transient());
//! ```

use thiserror::Error;

/// Error type for provider adapter operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Authentication failed: bad credentials, rejected token exchange or
    /// rejected request signature.
    #[error("provider auth failure: {message}")]
    AuthFailure {
        /// Error message.
        message: String,
    },

    /// Upstream returned a non-2xx HTTP status.
    #[error("provider http error ({status}): {message}")]
    UpstreamHttp {
        /// HTTP status code.
        status: u16,
        /// Error message or response body excerpt.
        message: String,
    },

    /// Transport-level failure with no HTTP status (DNS, TLS, connect,
    /// client-side request timeout).
    #[error("provider network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Poll budget exhausted without a completion marker and with nothing
    /// accumulated.
    #[error("provider timed out: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Zero offers with no failure. Adapters do not return this from
    /// `search`; it exists for classification at reporting boundaries.
    #[error("provider returned no offers")]
    EmptyResult,

    /// Response body parsed but is missing required structure.
    #[error("provider malformed response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates an authentication failure.
    #[must_use]
    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::AuthFailure {
            message: message.into(),
        }
    }

    /// Creates an upstream HTTP error.
    #[must_use]
    pub fn upstream_http(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Returns the HTTP status, when the failure carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this failure is an authentication problem.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }

    /// Returns true if this failure is transient and a later identical
    /// call may succeed. The core never retries; callers may.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::UpstreamHttp { status, .. } => *status >= 500,
            Self::AuthFailure { .. } | Self::EmptyResult | Self::MalformedResponse { .. } => false,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_5xx_is_transient() {
        assert!(ProviderError::upstream_http(500, "boom").is_transient());
        assert!(ProviderError::upstream_http(503, "busy").is_transient());
    }

    #[test]
    fn upstream_4xx_is_not_transient() {
        assert!(!ProviderError::upstream_http(404, "gone").is_transient());
    }

    #[test]
    fn auth_failure_is_not_transient() {
        let error = ProviderError::auth_failure("bad key");
        assert!(error.is_auth_failure());
        assert!(!error.is_transient());
    }

    #[test]
    fn network_and_timeout_are_transient() {
        assert!(ProviderError::network("connect refused").is_transient());
        assert!(ProviderError::timeout("poll budget exhausted").is_transient());
    }

    #[test]
    fn status_accessor() {
        assert_eq!(ProviderError::upstream_http(429, "slow down").status(), Some(429));
        assert_eq!(ProviderError::network("x").status(), None);
    }

    #[test]
    fn display_format() {
        let error = ProviderError::upstream_http(500, "internal");
        let display = error.to_string();
        assert!(display.contains("500"));
        assert!(display.contains("internal"));
    }
}
