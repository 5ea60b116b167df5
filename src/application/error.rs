//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These wrap the lower layers' typed failures for use cases that touch
//! more than one of them. Note that provider failures inside an
//! aggregation round are not errors at this level — they surface as data
//! in the aggregate result.

use crate::domain::errors::DomainError;
use crate::infrastructure::notification::NotificationError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::providers::error::ProviderError;
use thiserror::Error;

/// Error type for application use cases.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Input failed structural validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Domain invariant violated.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Provider failure escalated outside an aggregation round.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Persistence failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Notification failure escalated past the best-effort boundary.
    #[error("notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type for application use cases.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_domain_errors() {
        let error: ApplicationError = DomainError::EmptyItinerary.into();
        assert!(matches!(error, ApplicationError::Domain(_)));
    }

    #[test]
    fn validation_display() {
        let error = ApplicationError::validation("origin is required");
        assert!(error.to_string().contains("origin is required"));
    }
}
