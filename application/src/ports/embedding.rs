//! Embedding provider port

use async_trait::async_trait;
use chorus_domain::EmbeddingVector;
use std::time::Duration;
use thiserror::Error;

/// Errors from an embedding call. Never fatal to a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("API key not configured ({0} is not set)")]
    MissingCredential(String),

    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("malformed embedding response: {0}")]
    Malformed(String),

    #[error("embedding timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Turns text into a fixed-length vector for similarity comparison
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model_name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;
}
