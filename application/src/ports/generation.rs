//! Generation provider port
//!
//! Defines the interface for asking one text-generation provider a question.

use async_trait::async_trait;
use chorus_domain::{Conversation, Language, ProviderName};
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryableError;

/// Per-attempt budget used when a provider does not configure its own.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors a generation provider can report for one attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("API key not configured ({0} is not set)")]
    MissingCredential(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty response")]
    Empty,
}

impl ProviderError {
    /// Check if another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) | ProviderError::Timeout(_) | ProviderError::Malformed(_) => {
                true
            }
            ProviderError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            ProviderError::MissingCredential(_) | ProviderError::Empty => false,
        }
    }
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        ProviderError::is_retryable(self)
    }

    fn timed_out(after: Duration) -> Self {
        ProviderError::Timeout(after)
    }
}

/// A text-generation provider taking part in the fanout
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Unique name within one fanout
    fn name(&self) -> &ProviderName;

    /// Budget for a single attempt
    fn timeout(&self) -> Duration {
        DEFAULT_PROVIDER_TIMEOUT
    }

    /// Whether the output competes as an answer.
    ///
    /// Context-only participants (e.g. a news feed) return `false`: their
    /// text is reported with the raw responses but never embedded, selected
    /// or weighted.
    fn scored(&self) -> bool {
        true
    }

    /// Answer `question` given the prior `history`, in `language`.
    async fn generate(
        &self,
        history: &Conversation,
        question: &str,
        language: &Language,
    ) -> Result<String, ProviderError>;
}
