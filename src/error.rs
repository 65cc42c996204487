//! Error types shared by the adapters and the HTTP layer.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while building the streaming service adapter at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingCredential(&'static str),

    #[error("Unsupported streaming service: {0}")]
    UnsupportedService(String),

    #[error("{0} service not yet implemented")]
    NotImplemented(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Cannot load environment: {0}")]
    Env(String),
}

/// Failures of a single adapter operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An input constraint was violated; no outbound call was made.
    #[error("{0}")]
    Validation(String),

    /// The token endpoint rejected an exchange or refresh.
    #[error("{0}")]
    Auth(String),

    /// A resource call answered with a non-success status.
    #[error("{context}: HTTP {}", status.as_u16())]
    Upstream {
        status: StatusCode,
        context: &'static str,
    },

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected upstream response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Shorthand for [`ServiceError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
