//! Error types for the HTTP provider adapters

use chorus_application::{EmbeddingError, ProviderError};
use thiserror::Error;

/// Errors raised while talking to a vendor HTTP API
///
/// Converted into the application's [`ProviderError`] / [`EmbeddingError`]
/// at the port boundary.
#[derive(Error, Debug)]
pub enum HttpProviderError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("{0} is not set")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("No text in response")]
    Empty,
}

impl From<HttpProviderError> for ProviderError {
    fn from(err: HttpProviderError) -> Self {
        match err {
            HttpProviderError::MissingCredential(var) => ProviderError::MissingCredential(var),
            HttpProviderError::Request(e) if e.is_decode() => ProviderError::Malformed(e.to_string()),
            HttpProviderError::Request(e) => ProviderError::Network(e.to_string()),
            HttpProviderError::Client(msg) => ProviderError::Network(msg),
            HttpProviderError::Status { status, body } => ProviderError::Status { status, body },
            HttpProviderError::Parse(msg) | HttpProviderError::Api(msg) => ProviderError::Malformed(msg),
            HttpProviderError::Empty => ProviderError::Empty,
        }
    }
}

impl From<HttpProviderError> for EmbeddingError {
    fn from(err: HttpProviderError) -> Self {
        match err {
            HttpProviderError::MissingCredential(var) => EmbeddingError::MissingCredential(var),
            HttpProviderError::Parse(msg) | HttpProviderError::Api(msg) => EmbeddingError::Malformed(msg),
            HttpProviderError::Empty => EmbeddingError::Malformed("no vector in response".to_string()),
            other => EmbeddingError::Request(other.to_string()),
        }
    }
}
